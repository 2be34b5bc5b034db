use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use app_utils::{LevelFilter, config_from_env, init_tracing, load_dotenv, select_courses};
use canvas_api::calendar_event::CalendarEventQuery;
use canvas_api::client::Client;
use canvas_api::config::{Config, parse_base_url};
use canvas_api::course::EnrollmentState;
use canvas_api::course_selector::CourseSelector;
use canvas_report::{
    SubmissionSource, fetch_events, print_courses, print_courses_json, print_events, print_grades,
    print_groups, write_calendar,
};
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

/// Reports on your Canvas courses, assignments and grades.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Canvas instance to talk to [default: $CANVAS_URL, or the built in instance]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Items per page for list requests [default: $CANVAS_PER_PAGE or 100]
    #[arg(long, global = true)]
    per_page: Option<u32>,

    /// Per-request timeout in seconds [default: $CANVAS_TIMEOUT_SECS or 15]
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// More logging on stderr; repeat for more
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List your courses
    Courses {
        #[arg(long, default_value_t = EnrollmentState::Active)]
        state: EnrollmentState,

        /// Print the courses as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// List assignment groups and assignments for each course
    Groups(CourseArgs),
    /// Show grades, fetching your submission for each assignment separately
    Grades(CourseArgs),
    /// Show grades, with submissions embedded in the assignment listings
    BulkGrades(CourseArgs),
    /// List calendar events in a date range
    Events {
        /// First day to include [default: today]
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day to include [default: three weeks after the start]
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Only your own events, not your courses'
        #[arg(long)]
        personal: bool,

        /// Also save the events to this iCalendar (.ics) file
        #[arg(long, value_name = "PATH")]
        ics: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct CourseArgs {
    /// Only this course, by id, course code or name
    #[arg(long)]
    course: Option<String>,

    #[arg(long, default_value_t = EnrollmentState::Active)]
    state: EnrollmentState,
}

impl CourseArgs {
    fn selector(&self) -> Option<CourseSelector> {
        self.course.clone().map(CourseSelector::new)
    }
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    fn apply_overrides(&self, mut config: Config) -> Result<Config> {
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(parse_base_url(base_url)?);
        }
        if let Some(per_page) = self.per_page {
            config = config.with_per_page(per_page);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv_path = load_dotenv()?;
    init_tracing(cli.log_level())?;
    debug!(?dotenv_path, ?cli, "starting");

    let config = cli.apply_overrides(config_from_env()?)?;
    let canvas = Client::new(config);

    let mut out = io::stdout().lock();
    run(&canvas, cli.command, &mut out).await?;
    out.flush()?;

    Ok(())
}

async fn run(canvas: &Client, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Courses { state, json } => {
            let courses = select_courses(canvas, state, None).await?;
            if json {
                print_courses_json(&courses, out)
            } else {
                print_courses(&courses, out)
            }
        }
        Command::Groups(args) => {
            let courses = select_courses(canvas, args.state, args.selector().as_ref()).await?;
            print_groups(canvas, &courses, out).await
        }
        Command::Grades(args) => {
            let courses = select_courses(canvas, args.state, args.selector().as_ref()).await?;
            print_grades(canvas, &courses, SubmissionSource::PerAssignment, out).await
        }
        Command::BulkGrades(args) => {
            let courses = select_courses(canvas, args.state, args.selector().as_ref()).await?;
            print_grades(canvas, &courses, SubmissionSource::Embedded, out).await
        }
        Command::Events {
            start,
            end,
            personal,
            ics,
        } => {
            let start = start.unwrap_or_else(|| Local::now().date_naive());
            let mut query = match end {
                Some(end) => CalendarEventQuery::new(start, end),
                None => CalendarEventQuery::starting(start),
            };
            if !personal {
                let user = canvas
                    .get_current_user()
                    .await
                    .context("could not look up your Canvas user")?;
                let courses = select_courses(canvas, EnrollmentState::Active, None)
                    .await
                    .context("could not list courses for their calendars")?;
                query = query.with_user(&user).with_courses(&courses);
            }

            let events = fetch_events(canvas, &query).await?;
            print_events(&query, &events, out)?;
            if let Some(path) = ics {
                write_calendar(&events, Utc::now(), &path).await?;
            }
            Ok(())
        }
    }
}

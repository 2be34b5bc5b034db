use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use canvas_api::assignment::{Assignment, IncludeSubmission};
use canvas_api::calendar_event::{CalendarEvent, CalendarEventQuery};
use canvas_api::client::Client;
use canvas_api::course::Course;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::report::{
    AssignmentLine, CourseHeading, CourseLine, EventLine, GradeLine, GroupHeading, GroupStyle,
    ICalendar, NO_ASSIGNMENTS, NO_ASSIGNMENTS_IN_GROUP, NO_GROUPS, SubmissionLine,
};

pub mod report;

/// Where a grade report gets the user's submission for each assignment from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionSource {
    /// One `submissions/self` request per assignment.
    PerAssignment,
    /// Embedded in the assignment listing, one request per group.
    Embedded,
}

pub fn print_courses(courses: &[Course], out: &mut impl Write) -> Result<()> {
    for course in courses {
        writeln!(out, "{}", CourseLine(course))?;
    }
    Ok(())
}

pub fn print_courses_json(courses: &[Course], out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, courses).context("could not write courses as JSON")?;
    writeln!(out)?;
    Ok(())
}

/// Assignment groups and their assignments, without grades.
pub async fn print_groups(canvas: &Client, courses: &[Course], out: &mut impl Write) -> Result<()> {
    for course in courses {
        writeln!(out, "{}", CourseHeading(course))?;
        if let Err(err) = print_course_groups(canvas, course, out).await {
            report_course_error(course, &err, out)?;
        }
    }
    Ok(())
}

async fn print_course_groups(canvas: &Client, course: &Course, out: &mut impl Write) -> Result<()> {
    let groups = canvas.list_assignment_groups(course).await?;
    if groups.is_empty() {
        writeln!(out, "{NO_GROUPS}")?;
        return Ok(());
    }

    for group in &groups {
        writeln!(out, "{}", GroupHeading::new(group, GroupStyle::WithId))?;
        let assignments = canvas
            .list_assignments_in_group(course, group, IncludeSubmission::No)
            .await?;
        if assignments.is_empty() {
            writeln!(out, "{NO_ASSIGNMENTS_IN_GROUP}")?;
            continue;
        }

        for assignment in &assignments {
            writeln!(out, "{}", AssignmentLine(assignment))?;
        }
    }
    Ok(())
}

/// The course grade, then every assignment with the user's submission status and score.
pub async fn print_grades(
    canvas: &Client,
    courses: &[Course],
    source: SubmissionSource,
    out: &mut impl Write,
) -> Result<()> {
    for course in courses {
        writeln!(out, "{}", CourseHeading(course))?;
        if let Err(err) = print_course_grades(canvas, course, source, out).await {
            report_course_error(course, &err, out)?;
        }
    }
    Ok(())
}

async fn print_course_grades(
    canvas: &Client,
    course: &Course,
    source: SubmissionSource,
    out: &mut impl Write,
) -> Result<()> {
    if let Some(grades) = canvas.get_course_grade(course).await? {
        writeln!(out, "{}", GradeLine(&grades))?;
    }

    let groups = canvas.list_assignment_groups(course).await?;
    if groups.is_empty() {
        writeln!(out, "{NO_GROUPS}")?;
        return Ok(());
    }

    let include_submission = match source {
        SubmissionSource::PerAssignment => IncludeSubmission::No,
        SubmissionSource::Embedded => IncludeSubmission::Yes,
    };

    for group in &groups {
        writeln!(out, "{}", GroupHeading::new(group, GroupStyle::WeightOnly))?;
        let assignments = canvas
            .list_assignments_in_group(course, group, include_submission)
            .await?;
        if assignments.is_empty() {
            writeln!(out, "{NO_ASSIGNMENTS}")?;
            continue;
        }

        for assignment in &assignments {
            print_assignment_grade(canvas, course, assignment, source, out).await?;
        }
    }
    Ok(())
}

async fn print_assignment_grade(
    canvas: &Client,
    course: &Course,
    assignment: &Assignment,
    source: SubmissionSource,
    out: &mut impl Write,
) -> Result<()> {
    let fetched;
    let submission = match source {
        SubmissionSource::Embedded => assignment.submission(),
        SubmissionSource::PerAssignment => {
            fetched = canvas.get_own_submission(course, assignment).await?;
            fetched.as_ref()
        }
    };

    writeln!(out, "{}", AssignmentLine(assignment))?;
    writeln!(out, "{}", SubmissionLine(submission))?;
    Ok(())
}

/// A failure in one course is shown in its place and the report moves on.
fn report_course_error(course: &Course, err: &anyhow::Error, out: &mut impl Write) -> Result<()> {
    debug!(course = %course.id(), "{err:#}");
    writeln!(out, "  Error fetching data: {err:#}")?;
    Ok(())
}

pub async fn fetch_events(
    canvas: &Client,
    query: &CalendarEventQuery,
) -> Result<Vec<CalendarEvent>> {
    let events = canvas
        .list_calendar_events(query)
        .await
        .context("could not list calendar events")?;
    info!(count = events.len(), "got calendar events");
    Ok(events)
}

pub fn print_events(
    query: &CalendarEventQuery,
    events: &[CalendarEvent],
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Events from {} to {}:", query.start(), query.end())?;
    if events.is_empty() {
        writeln!(out, "  No events found.")?;
    }
    for event in events {
        writeln!(out, "{}", EventLine(event))?;
    }
    Ok(())
}

/// Saves `events` as an `.ics` file that calendar apps can import.
pub async fn write_calendar(
    events: &[CalendarEvent],
    stamp: DateTime<Utc>,
    path: &Path,
) -> Result<()> {
    let calendar = ICalendar::new(events, stamp).to_string();
    tokio::fs::write(path, calendar)
        .await
        .with_context(|| format!("could not write calendar to {}", path.display()))?;
    info!(path = %path.display(), count = events.len(), "wrote calendar");
    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use canvas_api::client::Client;
use canvas_api::config::Config;
use canvas_api::course::{Course, EnrollmentState};
use canvas_api::course_selector::CourseSelector;
use dotenvy::dotenv;
use tracing::{debug, info};
pub use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry, EnvFilter};

/// Loads `.env` into the environment, if there is one. Call this before [`init_tracing`] so that
/// `RUST_LOG` can come from the file too.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err).context("could not load .env"),
    }
}

pub fn config_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    debug!(?config, "read Canvas configuration");
    Ok(config)
}

/// The user's courses, or just the one picked by `selector` if there is a selector.
pub async fn select_courses(
    canvas: &Client,
    state: EnrollmentState,
    selector: Option<&CourseSelector>,
) -> Result<Vec<Course>> {
    let courses = canvas
        .list_courses(state)
        .await
        .context("could not list courses from Canvas")?;
    info!(count = courses.len(), %state, "got courses");

    let Some(selector) = selector else {
        return Ok(courses);
    };

    let course = selector
        .select_from(&courses)
        .with_context(|| format!("no course matches `{}`", selector.as_str()))?
        .clone();
    Ok(vec![course])
}

/// Logs go to stderr so they never mix into a report printed on stdout. `RUST_LOG` overrides
/// `default_level`.
pub fn init_tracing(default_level: LevelFilter) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env()
        .context("invalid RUST_LOG")?;

    registry()
        .with(
            fmt::layer()
                .event_format(format().pretty())
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();

    Ok(())
}

use anyhow::Result;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::Client;
use crate::course::Course;
use crate::types::{CalendarEventId, Timestamp};
use crate::user::User;
use crate::util::with_query;

/// Canvas refuses more than this many `context_codes[]` in one request.
pub const MAX_CONTEXT_CODES: usize = 10;

/// How far ahead to look for events when no end date is given.
pub const DEFAULT_WINDOW: Days = Days::new(21);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    id: CalendarEventId,
    title: String,
    start_at: Option<Timestamp>,
    end_at: Option<Timestamp>,
    location_name: Option<String>,
    /// HTML, as entered in Canvas.
    description: Option<String>,
    /// `user_<id>` or `course_<id>`.
    context_code: Option<String>,
}

impl CalendarEvent {
    pub fn id(&self) -> CalendarEventId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_at(&self) -> Option<&Timestamp> {
        self.start_at.as_ref()
    }

    pub fn end_at(&self) -> Option<&Timestamp> {
        self.end_at.as_ref()
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn context_code(&self) -> Option<&str> {
        self.context_code.as_deref()
    }
}

/// Calendar events between two dates, inclusive.
///
/// With no contexts Canvas returns only the user's own calendar. Once any context is named, only
/// the named ones are searched, so a query for course events should name the user too.
#[derive(Debug, Clone)]
pub struct CalendarEventQuery {
    start: NaiveDate,
    end: NaiveDate,
    context_codes: Vec<String>,
}

impl CalendarEventQuery {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            context_codes: Vec::new(),
        }
    }

    /// `start` through `start` plus [`DEFAULT_WINDOW`].
    pub fn starting(start: NaiveDate) -> Self {
        let end = start.checked_add_days(DEFAULT_WINDOW).unwrap_or(NaiveDate::MAX);
        Self::new(start, end)
    }

    /// Puts the user's own calendar first, so it survives the [`MAX_CONTEXT_CODES`] cap.
    pub fn with_user(mut self, user: &User) -> Self {
        self.context_codes.insert(0, format!("user_{}", user.id()));
        self
    }

    pub fn with_courses<'a>(mut self, courses: impl IntoIterator<Item = &'a Course>) -> Self {
        self.context_codes
            .extend(courses.into_iter().map(|course| format!("course_{}", course.id())));
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    fn query_pairs(&self, per_page: u32) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("start_date", self.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.end.format("%Y-%m-%d").to_string()),
            ("per_page", per_page.to_string()),
        ];

        if self.context_codes.len() > MAX_CONTEXT_CODES {
            warn!(
                requested = self.context_codes.len(),
                max = MAX_CONTEXT_CODES,
                "too many calendar contexts; only the first ones are used"
            );
        }
        pairs.extend(
            self.context_codes
                .iter()
                .take(MAX_CONTEXT_CODES)
                .map(|code| ("context_codes[]", code.clone())),
        );

        pairs
    }
}

impl Client {
    #[tracing::instrument(skip(self), err(level = "debug"))]
    pub async fn list_calendar_events(
        &self,
        query: &CalendarEventQuery,
    ) -> Result<Vec<CalendarEvent>> {
        let url = with_query(
            self.api_url("/calendar_events")?,
            query.query_pairs(self.config().per_page()),
        );
        self.get_paginated(url).await
    }
}

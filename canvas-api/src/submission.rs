use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::client::Client;
use crate::course::Course;
use crate::types::{Points, Timestamp};
use crate::util::assignment_path;

/// The current user's submission for one assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    score: Option<Points>,
    submitted_at: Option<Timestamp>,
    late: Option<bool>,
}

impl Submission {
    pub fn new(score: Option<Points>, submitted_at: Option<Timestamp>, late: bool) -> Self {
        Self {
            score,
            submitted_at,
            late: Some(late),
        }
    }

    pub fn score(&self) -> Option<&Points> {
        self.score.as_ref()
    }

    pub fn submitted_at(&self) -> Option<&Timestamp> {
        self.submitted_at.as_ref()
    }

    /// Canvas creates placeholder submissions for every student, so a submission existing doesn't
    /// mean anything was turned in.
    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub fn is_late(&self) -> bool {
        self.late.unwrap_or(false)
    }
}

impl Client {
    /// The current user's submission, or `None` if Canvas has none for this assignment.
    #[tracing::instrument(
        skip(self, course, assignment),
        fields(course = %course.id(), assignment = %assignment.id()),
        err(level = "debug")
    )]
    pub async fn get_own_submission(
        &self,
        course: &Course,
        assignment: &Assignment,
    ) -> Result<Option<Submission>> {
        let url = self.api_url(&assignment_path(course, assignment, "/submissions/self"))?;
        self.get_json_optional(url).await
    }
}

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::assignment_group::AssignmentGroup;
use crate::client::Client;
use crate::course::Course;
use crate::submission::Submission;
use crate::types::{AssignmentId, Points, Timestamp};
use crate::util::{course_path, with_query};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    id: AssignmentId,
    name: String,
    due_at: Option<Timestamp>,
    points_possible: Option<Points>,
    /// The current user's submission, only present when asked for with `include[]=submission`.
    submission: Option<Submission>,
}

impl Assignment {
    pub fn new(
        id: AssignmentId,
        name: String,
        due_at: Option<Timestamp>,
        points_possible: Option<Points>,
    ) -> Self {
        Self {
            id,
            name,
            due_at,
            points_possible,
            submission: None,
        }
    }

    pub fn id(&self) -> AssignmentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn due_at(&self) -> Option<&Timestamp> {
        self.due_at.as_ref()
    }

    pub fn points_possible(&self) -> Option<&Points> {
        self.points_possible.as_ref()
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }
}

/// Whether to embed the current user's submission in each listed assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeSubmission {
    Yes,
    No,
}

impl Client {
    #[tracing::instrument(
        skip(self, course, group),
        fields(course = %course.id(), group = %group.id()),
        err(level = "debug")
    )]
    pub async fn list_assignments_in_group(
        &self,
        course: &Course,
        group: &AssignmentGroup,
        include_submission: IncludeSubmission,
    ) -> Result<Vec<Assignment>> {
        let path = course_path(
            course,
            &format!("/assignment_groups/{}/assignments", group.id()),
        );

        let mut query = vec![("per_page", self.config().per_page().to_string())];
        if include_submission == IncludeSubmission::Yes {
            query.push(("include[]", "submission".to_owned()));
        }

        let url = with_query(self.api_url(&path)?, query);
        self.get_paginated(url).await
    }
}

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::course::Course;
use crate::types::{AssignmentGroupId, Points};
use crate::util::{course_path, with_query};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentGroup {
    id: AssignmentGroupId,
    name: String,
    /// Percentage of the course grade. Absent or null when the course doesn't weight groups.
    group_weight: Option<Points>,
}

impl AssignmentGroup {
    pub fn new(id: AssignmentGroupId, name: String, group_weight: Option<Points>) -> Self {
        Self {
            id,
            name,
            group_weight,
        }
    }

    pub fn id(&self) -> AssignmentGroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group_weight(&self) -> Option<&Points> {
        self.group_weight.as_ref()
    }
}

impl Client {
    #[tracing::instrument(
        skip(self, course),
        fields(course = %course.id()),
        err(level = "debug")
    )]
    pub async fn list_assignment_groups(&self, course: &Course) -> Result<Vec<AssignmentGroup>> {
        let url = with_query(
            self.api_url(&course_path(course, "/assignment_groups"))?,
            [("per_page", self.config().per_page().to_string())],
        );
        self.get_paginated(url).await
    }
}

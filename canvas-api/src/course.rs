use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::types::CourseId;
use crate::util::with_query;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    /// Missing when access to the course is restricted by date.
    name: Option<String>,
    course_code: Option<String>,
}

impl Course {
    pub fn new(id: CourseId, name: Option<String>, course_code: Option<String>) -> Self {
        Self {
            id,
            name,
            course_code,
        }
    }

    pub fn id(&self) -> CourseId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn course_code(&self) -> Option<&str> {
        self.course_code.as_deref()
    }
}

/// Which of the user's enrollments to list courses for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnrollmentState {
    #[default]
    Active,
    InvitedOrPending,
    Completed,
}

impl EnrollmentState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::InvitedOrPending => "invited_or_pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for EnrollmentState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "invited_or_pending" => Ok(Self::InvitedOrPending),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "unknown enrollment state `{other}`; expected active, invited_or_pending or completed"
            )),
        }
    }
}

impl Client {
    /// Courses the current user is enrolled in with the given enrollment state.
    #[tracing::instrument(skip(self), err(level = "debug"))]
    pub async fn list_courses(&self, state: EnrollmentState) -> Result<Vec<Course>> {
        let url = with_query(
            self.api_url("/users/self/courses")?,
            [
                ("enrollment_state", state.to_string()),
                ("per_page", self.config().per_page().to_string()),
            ],
        );
        self.get_paginated(url).await
    }
}

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::course::Course;
use crate::types::Points;
use crate::util::{course_path, with_query};

/// The current user's overall grade in a course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grades {
    pub current_score: Option<Points>,
    pub final_score: Option<Points>,
    pub current_grade: Option<String>,
    pub final_grade: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Enrollment {
    #[serde(default)]
    grades: Grades,
}

impl Client {
    /// Grades from the current user's first enrollment in `course`, or `None` if they have no
    /// enrollment there.
    #[tracing::instrument(
        skip(self, course),
        fields(course = %course.id()),
        err(level = "debug")
    )]
    pub async fn get_course_grade(&self, course: &Course) -> Result<Option<Grades>> {
        let url = with_query(
            self.api_url(&course_path(course, "/enrollments"))?,
            [("user_id", "self".to_owned())],
        );

        let enrollments: Vec<Enrollment> = self.get_json(url).await?;
        debug!(count = enrollments.len(), "got enrollments");

        Ok(enrollments
            .into_iter()
            .next()
            .map(|enrollment| enrollment.grades))
    }
}

//! Holds value types that don't "do" much: ID newtypes, point values and API timestamps. These are
//! shared across the Canvas data model.

use std::fmt;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_types {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name {
                id: u64,
            }

            impl $name {
                pub fn new(id: u64) -> Self {
                    Self { id }
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    fmt::Display::fmt(&self.id, f)
                }
            }
        )+
    };
}

id_types! {
    CourseId,
    AssignmentGroupId,
    AssignmentId,
    CalendarEventId,
    UserId,
}

/// A number as Canvas sent it. Kept verbatim so that `10.0` prints as `10.0` and `10` as `10`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Points {
    points: serde_json::Number,
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.points, f)
    }
}

/// An ISO 8601 timestamp string from the API, e.g. `2024-09-01T05:59:59Z`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp {
    timestamp: String,
}

impl Timestamp {
    pub fn new(timestamp: String) -> Self {
        Self { timestamp }
    }

    pub fn as_str(&self) -> &str {
        &self.timestamp
    }

    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|datetime| datetime.with_timezone(&Utc))
            .with_context(|| format!("`{}` is not an RFC 3339 timestamp", self.timestamp))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.timestamp)
    }
}

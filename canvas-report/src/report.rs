//! The lines of the console report. Each type renders exactly one line through `Display`.

use core::fmt;

use canvas_api::assignment::Assignment;
use canvas_api::assignment_group::AssignmentGroup;
use canvas_api::calendar_event::CalendarEvent;
use canvas_api::course::Course;
use canvas_api::enrollment::Grades;
use canvas_api::submission::Submission;
use canvas_api::types::Timestamp;
use chrono::{DateTime, Utc};

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_DUE_DATE: &str = "No due date";
pub const NO_GROUPS: &str = "  No assignment groups found.";
pub const NO_ASSIGNMENTS: &str = "     No assignments found.";
pub const NO_ASSIGNMENTS_IN_GROUP: &str = "     No assignments found in this group.";

/// Shows the value, or a fallback when there isn't one.
struct Or<'a, T>(Option<T>, &'a str);

impl<T: fmt::Display> fmt::Display for Or<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str(self.1),
        }
    }
}

fn or_na<T>(value: Option<T>) -> Or<'static, T> {
    Or(value, NOT_AVAILABLE)
}

#[derive(Debug, Clone, Copy)]
pub struct CourseHeading<'a>(pub &'a Course);

impl fmt::Display for CourseHeading<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\n=== {} ({}) ===", or_na(self.0.name()), self.0.id())
    }
}

/// A course listing entry, without the report framing.
#[derive(Debug, Clone, Copy)]
pub struct CourseLine<'a>(pub &'a Course);

impl fmt::Display for CourseLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let course = self.0;
        write!(f, "{} ({})", or_na(course.name()), course.id())?;
        if let Some(code) = course.course_code() {
            write!(f, " [{code}]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GradeLine<'a>(pub &'a Grades);

impl fmt::Display for GradeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "  Current Grade: {} ({}%)",
            or_na(self.0.current_grade.as_deref()),
            or_na(self.0.current_score.as_ref()),
        )
    }
}

/// How a group heading is written. The plain listing shows group ids; the grade reports don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStyle {
    WithId,
    WeightOnly,
}

#[derive(Debug, Clone, Copy)]
pub struct GroupHeading<'a> {
    group: &'a AssignmentGroup,
    style: GroupStyle,
}

impl<'a> GroupHeading<'a> {
    pub fn new(group: &'a AssignmentGroup, style: GroupStyle) -> Self {
        Self { group, style }
    }
}

impl fmt::Display for GroupHeading<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (name, weight) = (self.group.name(), or_na(self.group.group_weight()));
        match self.style {
            GroupStyle::WithId => write!(
                f,
                "\n  ▶ {name} (ID: {}) | Weight: {weight}%",
                self.group.id()
            ),
            GroupStyle::WeightOnly => write!(f, "\n  ▶ {name} (Weight: {weight}%)"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AssignmentLine<'a>(pub &'a Assignment);

impl fmt::Display for AssignmentLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let assignment = self.0;
        write!(
            f,
            "     • {} | Points: {} | Due: {}",
            assignment.name(),
            or_na(assignment.points_possible()),
            Or(assignment.due_at(), NO_DUE_DATE),
        )
    }
}

/// The current user's submission status. No submission at all reads the same as one that was never
/// turned in.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionLine<'a>(pub Option<&'a Submission>);

impl fmt::Display for SubmissionLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let submission = self.0;
        let submitted = if submission.is_some_and(Submission::is_submitted) {
            "Yes"
        } else {
            "No"
        };
        let late = if submission.is_some_and(Submission::is_late) {
            " (Late)"
        } else {
            ""
        };
        let score = or_na(submission.and_then(Submission::score));

        write!(f, "       Submitted: {submitted}{late} | Score: {score}")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EventLine<'a>(pub &'a CalendarEvent);

impl fmt::Display for EventLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let event = self.0;
        write!(
            f,
            "  • {} | {}",
            Or(event.start_at().map(When), "No start time"),
            event.title()
        )?;
        if let Some(location) = event.location_name().filter(|name| !name.is_empty()) {
            write!(f, " @ {location}")?;
        }
        Ok(())
    }
}

/// A timestamp in a shorter form than the API's, when it parses.
struct When<'a>(&'a Timestamp);

impl fmt::Display for When<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0.to_datetime() {
            Ok(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M UTC")),
            Err(_) => f.write_str(self.0.as_str()),
        }
    }
}

/// Events as an iCalendar (RFC 5545) file, CRLF line endings included. Events without a usable
/// start time can't be placed on a calendar and are left out.
#[derive(Debug, Clone, Copy)]
pub struct ICalendar<'a> {
    events: &'a [CalendarEvent],
    stamp: DateTime<Utc>,
}

impl<'a> ICalendar<'a> {
    /// `stamp` becomes every event's `DTSTAMP`.
    pub fn new(events: &'a [CalendarEvent], stamp: DateTime<Utc>) -> Self {
        Self { events, stamp }
    }
}

impl fmt::Display for ICalendar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        content_line(f, "BEGIN", "VCALENDAR")?;
        content_line(f, "VERSION", "2.0")?;
        content_line(f, "CALSCALE", "GREGORIAN")?;
        content_line(f, "PRODID", "-//canvas-report//Canvas Events//EN")?;

        for event in self.events {
            let Some(start) = event.start_at().and_then(|at| at.to_datetime().ok()) else {
                continue;
            };
            let end = event
                .end_at()
                .and_then(|at| at.to_datetime().ok())
                .unwrap_or(start);

            content_line(f, "BEGIN", "VEVENT")?;
            // Stable across exports, so importing again updates events instead of duplicating them
            content_line(f, "UID", &format!("canvas-event-{}@canvas-report", event.id()))?;
            content_line(f, "DTSTAMP", &ical_time(self.stamp))?;
            content_line(f, "SUMMARY", &ical_text(event.title()))?;
            content_line(f, "DTSTART", &ical_time(start))?;
            content_line(f, "DTEND", &ical_time(end))?;
            content_line(f, "DESCRIPTION", &ical_text(event.description().unwrap_or("")))?;
            content_line(f, "LOCATION", &ical_text(event.location_name().unwrap_or("")))?;
            content_line(f, "END", "VEVENT")?;
        }

        content_line(f, "END", "VCALENDAR")
    }
}

/// Content lines longer than 75 octets are folded onto continuation lines starting with a space.
const ICAL_LINE_OCTETS: usize = 75;

fn content_line(f: &mut fmt::Formatter, name: &str, value: &str) -> fmt::Result {
    let mut octets = 0;
    for c in name.chars().chain([':']).chain(value.chars()) {
        if octets + c.len_utf8() > ICAL_LINE_OCTETS {
            f.write_str("\r\n ")?;
            octets = 1;
        }
        f.write_str(c.encode_utf8(&mut [0; 4]))?;
        octets += c.len_utf8();
    }
    f.write_str("\r\n")
}

fn ical_time(datetime: DateTime<Utc>) -> String {
    datetime.format("%Y%m%dT%H%M%SZ").to_string()
}

fn ical_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.replace("\r\n", "\n").chars() {
        match c {
            '\\' | ';' | ',' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub mod assignment;
pub mod assignment_group;
pub mod calendar_event;
pub mod client;
pub mod config;
pub mod course;
pub mod course_selector;
pub mod enrollment;
pub mod pagination;
pub mod services;
pub mod submission;
pub mod types;
pub mod user;

mod response;
mod util;

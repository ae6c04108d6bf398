//! Pure helpers shared by the action pipeline

pub mod dates;

pub use dates::{apply_time, localize, parse_hh_mm, resolve_event_start_date, resolve_task_due_date};

//! Action execution
//!
//! - [`ActionExecutor`]: one intent against its integration
//! - [`BatchAggregator`]: ordered sequential execution with aggregation
//! - [`classifier`]: failure taxonomy and user-facing messages

pub mod batch;
pub mod classifier;
pub mod executor;
pub mod mime;
pub mod ports;

pub use batch::BatchAggregator;
pub use executor::ActionExecutor;
pub use ports::{
    CalendarGateway, CreatedEvent, CreatedTask, MailGateway, NewCalendarEvent, NewTask,
    SentMessage, TaskGateway,
};

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use client::CalendarClient;
pub use config::Config;
pub use error::{Error, TeamupResult};
pub use models::{CalendarEvent, EventQuery, RecurringDeletionMode, Subcalendar};

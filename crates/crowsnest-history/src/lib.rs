//! Bounded, durable alert history for the crowsnest monitoring engine.
//!
//! [`HistoryStore`] keeps the most recent [`MAX_HISTORY`] persisted alerts,
//! newest first, mirrored to a SQLite database so the log survives restarts.
//! Durable-storage failures degrade to in-memory operation with a log line,
//! never an error surfaced to the evaluation loop. The [`query`] module
//! provides the category/date-window filtering and calendar-day grouping
//! used by the presentation layer.

pub mod error;
pub mod query;
pub mod store;


pub use error::HistoryError;
pub use query::{group_by_day, DateWindow, DayGroup, HistoryFilter};
pub use store::{ClearScope, HistoryStore, MAX_HISTORY};

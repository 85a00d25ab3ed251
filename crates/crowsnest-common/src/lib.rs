//! Shared data model for the crowsnest monitoring engine: telemetry
//! snapshots, alerts, persisted history records, and ID generation.

pub mod id;
pub mod types;

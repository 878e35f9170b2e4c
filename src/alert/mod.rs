/// Alert post-processing.
///
/// The API returns alerts as a flat list; `grouping` organizes them into
/// per-reading groups with derived severity/status aggregates for the
/// alert panel, and computes the id sets for bulk status transitions.

pub mod grouping;

pub use grouping::{AlertGroup, group_alerts, UNKNOWN_READING_GROUP};

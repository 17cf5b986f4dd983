//! Application lifecycle domain model for the Placemint job tracker.
//!
//! The [`pipeline`] module holds the stage state machine, owner-scoped service and HTTP router;
//! the remaining modules carry configuration, telemetry and the top-level error type shared with
//! the API service binary.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod telemetry;

//! Poll cycle orchestration and status publishing
//!
//! # Modules
//!
//! - [`components`]: Normalized set of active components
//! - [`cycle`]: One resolve-and-fetch cycle producing a [`cycle::PollResult`]
//! - [`scheduler`]: Interval-driven [`scheduler::Monitor`] publishing each result
//! - [`status`]: Read-only status value derived from the latest result

pub mod components;
pub mod cycle;
pub mod error;
pub mod scheduler;
pub mod status;

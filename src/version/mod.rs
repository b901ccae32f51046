//! Release resolution and breaking change lookup
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    PyPI     │────▶│    Range    │────▶│ Changes API │
//! │  (latest)   │     │ (releases)  │     │(per release)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`range`]: Feature releases between the running and the latest version
//! - [`registry`]: Source traits for remote release and change data
//! - [`registries`]: Concrete HTTP sources (PyPI, breaking changes API)
//! - [`release`]: PEP 440 release parsing helpers
//! - [`error`]: Error type for remote sources
//! - [`types`]: Change records

pub mod error;
pub mod range;
pub mod registries;
pub mod registry;
pub mod release;
pub mod types;

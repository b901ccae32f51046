pub mod config;
pub mod logging;
pub mod monitor;
pub mod store;
pub mod version;

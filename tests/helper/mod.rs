mod server;
mod sources;

pub use server::*;
pub use sources::*;

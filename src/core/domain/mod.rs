//! Domain types.

mod entry;
mod env;

pub use entry::{EnvEntry, EnvFile};
pub use env::DotEnv;

mod backup;
mod config;
mod inspect;

pub use backup::*;
pub use config::*;
pub use inspect::*;

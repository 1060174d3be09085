pub mod config;
pub mod error;
pub mod report;

pub use config::*;
pub use error::*;
pub use report::*;

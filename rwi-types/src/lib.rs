pub mod doa;
pub mod error;
pub mod geometry;
pub mod metadata;
pub mod paths;
pub mod positions;
pub mod record;

pub use doa::*;
pub use error::*;
pub use geometry::*;
pub use metadata::*;
pub use paths::*;
pub use positions::*;
pub use record::*;

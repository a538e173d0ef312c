mod build;
mod group;
mod load;
mod resolve;
mod types;

pub use build::*;
pub use group::*;
pub use load::*;
pub use resolve::*;
pub use types::*;

//! Captured traffic (`demoData`) and its conversion into replayable groups.

mod adapter;
mod types;

pub use adapter::*;
pub use types::*;

mod queries;
mod types;
pub mod workflow;

pub use queries::*;
pub use types::*;

//! Types clients exchange with the orchestrator.
mod errors;
mod input;

pub use errors::{Result, RuntimeError};
pub use input::{InputRequest, Response};

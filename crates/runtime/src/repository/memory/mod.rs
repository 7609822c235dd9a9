//! In-memory repositories for tests and local runs.

mod report;
mod session;

pub use report::InMemoryReportRepository;
pub use session::InMemorySessionRepository;

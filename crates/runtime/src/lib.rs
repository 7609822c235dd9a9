//! Runtime orchestration for tactical combat sessions.
//!
//! This crate wires the deterministic `game-core` engine to content oracles,
//! repositories and an event bus. Clients drive a session through
//! [`CombatOrchestrator`]: they hand it [`InputRequest`] values and poll
//! [`CombatOrchestrator::tick`] so turn countdowns and enemy think delays
//! advance.
//!
//! Modules are organized by responsibility:
//! - [`orchestrator`] owns the session, timers and the AI turn loop
//! - [`api`] exposes the request/response and error types clients use
//! - [`events`] provides the topic-based event bus
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod events;
pub mod oracle;
pub mod orchestrator;
pub mod repository;

pub use api::{InputRequest, Response, Result, RuntimeError};
pub use events::{Event, EventBus, SessionEvent, Topic};
pub use oracle::{
    ArchetypeOracleImpl, CharacterOracleImpl, ConfigOracleImpl, OracleManager, SpellOracleImpl,
};
pub use orchestrator::{CombatOrchestrator, OrchestratorBuilder};
pub use repository::{
    FileReportRepository, FileSessionRepository, InMemoryReportRepository,
    InMemorySessionRepository, ReportRepository, RepositoryError, SessionRepository,
    StoredReport,
};

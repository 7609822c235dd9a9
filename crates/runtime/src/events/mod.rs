//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. Combat events come straight from the engine;
//! session events describe the orchestrator's own lifecycle.

mod bus;

pub use bus::{Event, EventBus, SessionEvent, Topic};

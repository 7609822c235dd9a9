//! Player input and the orchestrator's answer to it.

use game_core::{CombatEvent, Position, Refusal, SpellId};
use serde::{Deserialize, Serialize};

/// One player request. Enemy turns never go through here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputRequest {
    /// Relocate the player within its spawn zone (positioning only).
    PlaceAt(Position),
    /// Leave positioning and start the fight.
    Ready,
    MoveTo(Position),
    /// Basic weapon attack on an adjacent cell.
    Attack(Position),
    CastAt { spell: SpellId, target: Position },
    EndTurn,
}

impl InputRequest {
    pub fn cast(spell: impl Into<String>, target: Position) -> Self {
        Self::CastAt {
            spell: SpellId::new(spell),
            target,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// The request ran; these events were published.
    Accepted { events: Vec<CombatEvent> },
    /// Nothing changed.
    Refused(Refusal),
}

impl Response {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Response::Accepted { .. })
    }

    pub fn refusal(&self) -> Option<&Refusal> {
        match self {
            Response::Refused(refusal) => Some(refusal),
            Response::Accepted { .. } => None,
        }
    }

    pub fn events(&self) -> &[CombatEvent] {
        match self {
            Response::Accepted { events } => events,
            Response::Refused(_) => &[],
        }
    }
}

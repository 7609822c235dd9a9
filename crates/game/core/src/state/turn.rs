use arrayvec::ArrayVec;

use crate::config::GameConfig;

use super::EntityId;

/// Phase of a combat session.
///
/// `Positioning` → `Playing` → `Victory` | `Defeat`. The last two are terminal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    #[default]
    Positioning,
    Playing,
    Victory,
    Defeat,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }
}

/// Turn-order bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub phase: Phase,

    /// 1-based round counter. Zero until combat starts.
    pub round: u32,

    /// Index into `order` of the combatant currently acting.
    pub actor_index: usize,

    /// Fixed acting order, built when positioning ends.
    pub order: ArrayVec<EntityId, { GameConfig::MAX_COMBATANTS }>,

    /// Sequential identifier incremented by every executed action.
    /// Mixed into RNG seeds so every roll is unique and replayable.
    pub nonce: u64,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Positioning,
            round: 0,
            actor_index: 0,
            order: ArrayVec::new(),
            nonce: 0,
        }
    }

    /// The combatant whose turn it is, if combat is running.
    pub fn current_actor(&self) -> Option<EntityId> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.order.get(self.actor_index).copied()
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

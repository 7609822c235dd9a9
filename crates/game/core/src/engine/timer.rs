//! Cancellable turn timers.
//!
//! Timers never block. The owner advances them with [`TurnTimer::tick`] and
//! reacts to the kind it returns on expiry.

use crate::config::GameConfig;
use crate::state::{CombatantState, EntityId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TimerKind {
    /// Player's time to act; expiry forces the turn to pass.
    TurnCountdown,
    /// Enemy "thinking" pause; expiry runs the AI.
    ThinkDelay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnTimer {
    kind: TimerKind,
    actor: EntityId,
    remaining: u32,
    armed: bool,
}

impl TurnTimer {
    pub fn new(kind: TimerKind, actor: EntityId, ticks: u32) -> Self {
        Self {
            kind,
            actor,
            remaining: ticks,
            armed: true,
        }
    }

    /// Countdown for a player-controlled turn, think delay otherwise.
    pub fn for_turn(combatant: &CombatantState, config: &GameConfig) -> Self {
        if combatant.is_player_controlled() {
            Self::new(
                TimerKind::TurnCountdown,
                combatant.id,
                config.turn_countdown_ticks,
            )
        } else {
            Self::new(TimerKind::ThinkDelay, combatant.id, config.ai_think_delay_ticks)
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn actor(&self) -> EntityId {
        self.actor
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn cancel(&mut self) {
        self.armed = false;
    }

    /// Advances the timer. Returns its kind exactly once, on the tick that
    /// exhausts it; a cancelled timer never fires.
    pub fn tick(&mut self, elapsed: u32) -> Option<TimerKind> {
        if !self.armed {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining == 0 {
            self.armed = false;
            return Some(self.kind);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_when_exhausted() {
        let mut timer = TurnTimer::new(TimerKind::TurnCountdown, EntityId::PLAYER, 3);
        assert_eq!(timer.tick(1), None);
        assert_eq!(timer.remaining(), 2);
        assert_eq!(timer.tick(5), Some(TimerKind::TurnCountdown));
        assert_eq!(timer.tick(1), None);
        assert!(!timer.is_armed());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timer = TurnTimer::new(TimerKind::ThinkDelay, EntityId(2), 1);
        timer.cancel();
        assert_eq!(timer.tick(10), None);
    }

    #[test]
    fn zero_tick_timer_fires_on_first_poll() {
        let mut timer = TurnTimer::new(TimerKind::ThinkDelay, EntityId(2), 0);
        assert_eq!(timer.tick(0), Some(TimerKind::ThinkDelay));
    }
}

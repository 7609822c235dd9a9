//! Basic weapon attack.

use crate::combat::{DamageResolver, EffectError, Hit, HitReport, apply_hits};
use crate::env::{GameEnv, OracleError, RollStream};
use crate::error::{ErrorSeverity, GameError, RefusalKind};
use crate::state::{CombatState, EntityId, Position, TurnFlags};

use super::{ActionTransition, ActorError, active_combatant};

/// Melee attack against the combatant standing on `target`.
///
/// Damage is `max(1, attack − defense + roll)` with `roll` uniform in
/// `±variance`, then run through the damage pipeline as neutral damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicAttackAction {
    pub actor: EntityId,
    pub target: Position,
}

impl BasicAttackAction {
    /// Basic attacks reach adjacent cells only.
    pub const RANGE: u32 = 1;

    pub fn new(actor: EntityId, target: Position) -> Self {
        Self { actor, target }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub roll: i32,
    pub hit: HitReport,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackError {
    #[error(transparent)]
    Actor(#[from] ActorError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("attack needs {required} AP, only {available} available")]
    NotEnoughActionPoints { required: u32, available: u32 },

    #[error("no living combatant at {0}")]
    NoTarget(Position),

    #[error("target at distance {distance} is out of reach")]
    OutOfRange { distance: u32 },

    #[error(transparent)]
    Effect(#[from] EffectError),
}

impl GameError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Actor(error) => error.severity(),
            Self::Oracle(error) => error.severity(),
            Self::NotEnoughActionPoints { .. } => ErrorSeverity::Recoverable,
            Self::NoTarget(_) | Self::OutOfRange { .. } => ErrorSeverity::Validation,
            Self::Effect(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Actor(error) => error.error_code(),
            Self::Oracle(error) => error.error_code(),
            Self::NotEnoughActionPoints { .. } => "ATTACK_NOT_ENOUGH_AP",
            Self::NoTarget(_) => "ATTACK_NO_TARGET",
            Self::OutOfRange { .. } => "ATTACK_OUT_OF_RANGE",
            Self::Effect(error) => error.error_code(),
        }
    }

    fn refusal(&self) -> Option<RefusalKind> {
        match self {
            Self::Actor(error) => error.refusal(),
            Self::NotEnoughActionPoints { .. } => Some(RefusalKind::InsufficientResource),
            Self::NoTarget(_) | Self::OutOfRange { .. } => Some(RefusalKind::InvalidTarget),
            Self::Oracle(_) | Self::Effect(_) => None,
        }
    }
}

impl ActionTransition for BasicAttackAction {
    type Error = AttackError;
    type Result = AttackOutcome;

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &CombatState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let attacker = active_combatant(state, self.actor)?;
        let cost = env.rules()?.basic_attack_cost;
        if !attacker.action_points.has(cost) {
            return Err(AttackError::NotEnoughActionPoints {
                required: cost,
                available: attacker.action_points.current,
            });
        }

        state
            .living_occupant(self.target)
            .ok_or(AttackError::NoTarget(self.target))?;
        let distance = attacker.position.distance(self.target);
        if distance != Self::RANGE {
            return Err(AttackError::OutOfRange { distance });
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, env: &GameEnv<'_>) -> Result<AttackOutcome, Self::Error> {
        let rules = env.rules()?;
        let attacker = active_combatant(state, self.actor)?;
        let defender = state
            .living_occupant(self.target)
            .ok_or(AttackError::NoTarget(self.target))?;

        let mut rolls = RollStream::new(env.rng()?, state.game_seed, state.turn.nonce, self.actor.0);
        let variance = rules.basic_attack_variance.abs();
        let roll = rolls.range_i32(-variance, variance);
        let hit = Hit {
            target: defender.id,
            position: self.target,
            damage: DamageResolver::basic_attack(&attacker.stats, &defender.stats, roll),
        };

        if let Some(attacker) = state.combatant_mut(self.actor) {
            attacker.action_points.debit(rules.basic_attack_cost);
            attacker.flags.insert(TurnFlags::ATTACKED);
        }
        let reports = apply_hits(state, &[hit])?;
        let hit = reports
            .into_iter()
            .next()
            .ok_or(EffectError::MissingCombatant(hit.target))?;

        Ok(AttackOutcome { roll, hit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::state::{CombatStats, Team};
    use crate::testing::{TestOracles, begin_playing, enemy_at, player_at};

    fn duel(enemy_position: Position) -> CombatState {
        let mut state = CombatState::new(Grid::new(6, 6), 99);
        let mut player = player_at(Position::new(2, 2));
        player.stats = CombatStats {
            attack: 12,
            ..CombatStats::default()
        };
        state.spawn(player).unwrap();
        state.spawn(enemy_at(1, enemy_position, 30)).unwrap();
        begin_playing(&mut state);
        state
    }

    #[test]
    fn adjacent_attack_lands_within_variance() {
        let oracles = TestOracles::new();
        let env = oracles.env();
        let mut state = duel(Position::new(3, 2));
        let action = BasicAttackAction::new(EntityId::PLAYER, Position::new(3, 2));

        action.pre_validate(&state, &env).unwrap();
        let outcome = action.apply(&mut state, &env).unwrap();

        assert!((-3..=3).contains(&outcome.roll));
        assert_eq!(outcome.hit.damage, (12 + outcome.roll) as u32);
        assert_eq!(state.player().unwrap().action_points.current, 3);
        let enemy = state.combatant(EntityId(1)).unwrap();
        assert_eq!(enemy.hp.current, 30 - outcome.hit.damage);
        assert_eq!(enemy.team, Team::Enemy);
    }

    #[test]
    fn distant_or_empty_targets_are_invalid() {
        let oracles = TestOracles::new();
        let env = oracles.env();
        let state = duel(Position::new(4, 2));

        let far = BasicAttackAction::new(EntityId::PLAYER, Position::new(4, 2))
            .pre_validate(&state, &env)
            .unwrap_err();
        assert_eq!(far, AttackError::OutOfRange { distance: 2 });

        let empty = BasicAttackAction::new(EntityId::PLAYER, Position::new(2, 3))
            .pre_validate(&state, &env)
            .unwrap_err();
        assert_eq!(empty.refusal(), Some(RefusalKind::InvalidTarget));
    }

    #[test]
    fn attack_without_ap_is_refused() {
        let oracles = TestOracles::new();
        let env = oracles.env();
        let mut state = duel(Position::new(3, 2));
        state
            .combatant_mut(EntityId::PLAYER)
            .unwrap()
            .action_points
            .debit(4);

        let err = BasicAttackAction::new(EntityId::PLAYER, Position::new(3, 2))
            .pre_validate(&state, &env)
            .unwrap_err();
        assert_eq!(err.refusal(), Some(RefusalKind::InsufficientResource));
    }
}

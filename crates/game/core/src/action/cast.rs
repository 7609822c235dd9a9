//! Spell casting.

use crate::combat::{
    DamageRange, EffectError, HitReport, Spell, SpellError, SpellId, apply_hits, plan_hits,
};
use crate::env::{GameEnv, OracleError, RollStream};
use crate::error::{ErrorSeverity, GameError, RefusalKind};
use crate::state::{CombatState, EntityId, Position, TurnFlags};

use super::{ActionTransition, ActorError, active_combatant};

/// Casts a known spell at a target cell.
///
/// Damage is rolled once per cast inside the spell's level-scaled range,
/// then resolved separately against every combatant the effect touches.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastSpellAction {
    pub actor: EntityId,
    pub spell: SpellId,
    pub target: Position,
}

impl CastSpellAction {
    pub fn new(actor: EntityId, spell: impl Into<String>, target: Position) -> Self {
        Self {
            actor,
            spell: SpellId::new(spell),
            target,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastOutcome {
    pub spell: SpellId,
    pub level: u8,
    pub target: Position,
    /// Value rolled inside the scaled damage range, before the pipeline.
    pub rolled: u32,
    pub hits: Vec<HitReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastError {
    #[error(transparent)]
    Actor(#[from] ActorError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("spell '{0}' is not in the caster's spell book")]
    UnknownSpell(SpellId),

    #[error(transparent)]
    Level(#[from] SpellError),

    #[error("spell needs {required} AP, only {available} available")]
    NotEnoughActionPoints { required: u32, available: u32 },

    #[error("spell '{spell}' is on cooldown for {remaining} more turn(s)")]
    OnCooldown { spell: SpellId, remaining: u32 },

    #[error("target {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("target at distance {distance} is outside range {min}..={max}")]
    OutOfRange { distance: u32, min: u32, max: u32 },

    #[error(transparent)]
    Effect(#[from] EffectError),
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Actor(error) => error.severity(),
            Self::Oracle(error) => error.severity(),
            Self::UnknownSpell(_) | Self::Level(_) => ErrorSeverity::Validation,
            Self::NotEnoughActionPoints { .. } | Self::OnCooldown { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::OutOfBounds(_) | Self::OutOfRange { .. } => ErrorSeverity::Validation,
            Self::Effect(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Actor(error) => error.error_code(),
            Self::Oracle(error) => error.error_code(),
            Self::UnknownSpell(_) => "CAST_UNKNOWN_SPELL",
            Self::Level(_) => "CAST_INVALID_LEVEL",
            Self::NotEnoughActionPoints { .. } => "CAST_NOT_ENOUGH_AP",
            Self::OnCooldown { .. } => "CAST_ON_COOLDOWN",
            Self::OutOfBounds(_) => "CAST_OUT_OF_BOUNDS",
            Self::OutOfRange { .. } => "CAST_OUT_OF_RANGE",
            Self::Effect(error) => error.error_code(),
        }
    }

    fn refusal(&self) -> Option<RefusalKind> {
        match self {
            Self::Actor(error) => error.refusal(),
            Self::UnknownSpell(_) | Self::Level(_) => Some(RefusalKind::InvalidTarget),
            Self::NotEnoughActionPoints { .. } => Some(RefusalKind::InsufficientResource),
            Self::OnCooldown { .. } => Some(RefusalKind::OnCooldown),
            Self::OutOfBounds(_) | Self::OutOfRange { .. } => Some(RefusalKind::InvalidTarget),
            Self::Oracle(error) => match error {
                OracleError::SpellNotFound(_) => Some(RefusalKind::InvalidTarget),
                _ => None,
            },
            Self::Effect(_) => None,
        }
    }
}

impl CastSpellAction {
    /// Resolves the spell at the caster's level and checks every refusal.
    fn prepare(&self, state: &CombatState, env: &GameEnv<'_>) -> Result<Spell, CastError> {
        let caster = active_combatant(state, self.actor)?;
        let slot = caster
            .spell(&self.spell)
            .ok_or_else(|| CastError::UnknownSpell(self.spell.clone()))?;
        let spell = env
            .spell(&self.spell)?
            .at_level(slot.level, env.rules()?.max_spell_level)?;

        if !caster.action_points.has(spell.ap_cost) {
            return Err(CastError::NotEnoughActionPoints {
                required: spell.ap_cost,
                available: caster.action_points.current,
            });
        }
        if !slot.is_ready() {
            return Err(CastError::OnCooldown {
                spell: self.spell.clone(),
                remaining: slot.cooldown,
            });
        }
        if !state.grid.contains(self.target) {
            return Err(CastError::OutOfBounds(self.target));
        }
        if !spell.in_range(caster.position, self.target) {
            return Err(CastError::OutOfRange {
                distance: caster.position.distance(self.target),
                min: spell.min_range,
                max: spell.range,
            });
        }
        Ok(spell)
    }
}

impl ActionTransition for CastSpellAction {
    type Error = CastError;
    type Result = CastOutcome;

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &CombatState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        self.prepare(state, env).map(|_| ())
    }

    fn apply(&self, state: &mut CombatState, env: &GameEnv<'_>) -> Result<CastOutcome, Self::Error> {
        let spell = self.prepare(state, env)?;
        let DamageRange { min, max } = spell.damage_range();
        let mut rolls = RollStream::new(env.rng()?, state.game_seed, state.turn.nonce, self.actor.0);
        let rolled = rolls.range(min, max);

        let caster_stats = active_combatant(state, self.actor)?.stats;
        let hits = plan_hits(
            state,
            &caster_stats,
            spell.element,
            rolled,
            spell.shape,
            self.target,
        );

        if let Some(caster) = state.combatant_mut(self.actor) {
            caster.action_points.debit(spell.ap_cost);
            caster.flags.insert(TurnFlags::CAST);
            if let Some(slot) = caster.spell_mut(&self.spell) {
                slot.cooldown = spell.cooldown.unwrap_or(0);
            }
        }
        let hits = apply_hits(state, &hits)?;

        Ok(CastOutcome {
            spell: spell.id,
            level: spell.level,
            target: self.target,
            rolled,
            hits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{EffectShape, Element};
    use crate::grid::Grid;
    use crate::testing::{TestOracles, begin_playing, enemy_at, player_at};

    fn oracles() -> TestOracles {
        TestOracles::new()
            .with_spell(
                Spell::new("fireball", "Fireball", Element::Fire, DamageRange::new(10, 10), 4, 6)
                    .with_cooldown(2)
                    .with_shape(EffectShape::Square {
                        radius: 1,
                        falloff_percent: 50,
                    }),
            )
            .with_spell(Spell::new(
                "pebble",
                "Pebble",
                Element::Earth,
                DamageRange::new(5, 8),
                2,
                3,
            ))
    }

    fn arena() -> CombatState {
        let mut state = CombatState::new(Grid::new(10, 10), 5);
        let player = player_at(Position::new(0, 0))
            .with_spell(SpellId::new("fireball"), 1)
            .with_spell(SpellId::new("pebble"), 3);
        state.spawn(player).unwrap();
        state.spawn(enemy_at(1, Position::new(4, 0), 100)).unwrap();
        state.spawn(enemy_at(2, Position::new(5, 0), 100)).unwrap();
        begin_playing(&mut state);
        state
    }

    #[test]
    fn area_cast_hits_every_occupant_with_falloff() {
        let oracles = oracles();
        let env = oracles.env();
        let mut state = arena();
        let action = CastSpellAction::new(EntityId::PLAYER, "fireball", Position::new(4, 0));

        action.pre_validate(&state, &env).unwrap();
        let outcome = action.apply(&mut state, &env).unwrap();

        assert_eq!(outcome.rolled, 10);
        assert_eq!(outcome.hits.len(), 2);
        assert_eq!(outcome.hits[0].damage, 10);
        assert_eq!(outcome.hits[1].damage, 5);
        let player = state.player().unwrap();
        assert_eq!(player.action_points.current, 2);
        assert_eq!(player.spell(&SpellId::new("fireball")).unwrap().cooldown, 2);
    }

    #[test]
    fn cooldown_blocks_recast() {
        let oracles = oracles();
        let env = oracles.env();
        let mut state = arena();
        let action = CastSpellAction::new(EntityId::PLAYER, "fireball", Position::new(4, 0));
        action.apply(&mut state, &env).unwrap();
        state
            .combatant_mut(EntityId::PLAYER)
            .unwrap()
            .action_points
            .refill();

        let err = action.pre_validate(&state, &env).unwrap_err();
        assert_eq!(err.refusal(), Some(RefusalKind::OnCooldown));
    }

    #[test]
    fn rolled_damage_uses_the_slot_level() {
        let oracles = oracles();
        let env = oracles.env();
        let mut state = arena();
        let outcome = CastSpellAction::new(EntityId::PLAYER, "pebble", Position::new(3, 0))
            .apply(&mut state, &env)
            .unwrap();
        assert_eq!(outcome.level, 3);
        assert!((7..=11).contains(&outcome.rolled));
        assert!(outcome.hits.is_empty());
    }

    #[test]
    fn refusals_leave_state_untouched() {
        let oracles = oracles();
        let env = oracles.env();
        let state = arena();
        let before = state.clone();

        let cases = [
            (CastSpellAction::new(EntityId::PLAYER, "unknown", Position::new(1, 0)), RefusalKind::InvalidTarget),
            (CastSpellAction::new(EntityId::PLAYER, "pebble", Position::new(9, 9)), RefusalKind::InvalidTarget),
            (CastSpellAction::new(EntityId::PLAYER, "pebble", Position::new(-1, 0)), RefusalKind::InvalidTarget),
            (CastSpellAction::new(EntityId(1), "pebble", Position::new(1, 0)), RefusalKind::NotYourTurn),
        ];
        for (action, kind) in cases {
            let err = action.pre_validate(&state, &env).unwrap_err();
            assert_eq!(err.refusal(), Some(kind), "{err}");
        }
        assert_eq!(state, before);
    }
}

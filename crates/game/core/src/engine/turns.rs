//! Turn scheduler.
//!
//! `Positioning → Playing → Victory | Defeat`. The player acts first, then
//! every enemy by id; dead combatants are skipped and never start a turn.

use crate::config::GameConfig;
use crate::env::{EnemyArchetype, GameEnv, OracleError};
use crate::error::{ErrorContext, ErrorSeverity, GameError, RefusalKind};
use crate::events::CombatEvent;
use crate::state::{ArchetypeId, EntityId, InitializationError, Phase, Team, TurnFlags};

use super::GameEngine;

/// Errors raised by turn transitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("turn transitions are not accepted during the {phase} phase")]
    WrongPhase {
        phase: Phase,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },

    #[error("{actor} cannot end the turn of {current:?}")]
    NotYourTurn {
        actor: EntityId,
        current: Option<EntityId>,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },

    #[error("the player has not been placed on the grid")]
    PlayerNotPlaced,

    #[error("encounter lists {requested} enemies, the limit is {limit}")]
    TooManyEnemies { requested: usize, limit: usize },

    #[error("encounter needs {requested} enemy spawn cells, only {available} are free")]
    NotEnoughSpawnCells { requested: usize, available: usize },

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("failed to spawn an enemy: {0}")]
    Spawn(#[from] InitializationError),

    #[error("no living combatant is left in the turn order")]
    NoLivingActor,
}

impl TurnError {
    fn wrong_phase(phase: Phase, nonce: u64) -> Self {
        Self::WrongPhase {
            phase,
            context: ErrorContext::new(nonce),
        }
    }
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WrongPhase { .. } | Self::NotYourTurn { .. } | Self::PlayerNotPlaced => {
                ErrorSeverity::Recoverable
            }
            Self::TooManyEnemies { .. } | Self::NotEnoughSpawnCells { .. } => {
                ErrorSeverity::Validation
            }
            Self::Oracle(error) => error.severity(),
            Self::Spawn(_) | Self::NoLivingActor => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::WrongPhase { context, .. } | Self::NotYourTurn { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongPhase { .. } => "TURN_WRONG_PHASE",
            Self::NotYourTurn { .. } => "TURN_NOT_YOUR_TURN",
            Self::PlayerNotPlaced => "TURN_PLAYER_NOT_PLACED",
            Self::TooManyEnemies { .. } => "TURN_TOO_MANY_ENEMIES",
            Self::NotEnoughSpawnCells { .. } => "TURN_NOT_ENOUGH_SPAWN_CELLS",
            Self::Oracle(error) => error.error_code(),
            Self::Spawn(_) => "TURN_SPAWN_FAILED",
            Self::NoLivingActor => "TURN_NO_LIVING_ACTOR",
        }
    }

    fn refusal(&self) -> Option<RefusalKind> {
        match self {
            Self::WrongPhase { .. } | Self::PlayerNotPlaced => Some(RefusalKind::WrongPhase),
            Self::NotYourTurn { .. } => Some(RefusalKind::NotYourTurn),
            _ => None,
        }
    }
}

/// Turn scheduling methods for GameEngine.
impl<'a> GameEngine<'a> {
    /// The combatant whose turn it is, if combat is running.
    pub fn current_actor(&self) -> Option<EntityId> {
        self.state.turn.current_actor()
    }

    /// Ends positioning: spawns `enemies` onto free enemy spawn cells in
    /// row-major order, builds the turn order and starts the first turn.
    ///
    /// Every check runs before the first enemy is spawned.
    pub fn ready(
        &mut self,
        env: &GameEnv<'_>,
        enemies: &[ArchetypeId],
    ) -> Result<Vec<CombatEvent>, TurnError> {
        let phase = self.state.turn.phase;
        if phase != Phase::Positioning {
            return Err(TurnError::wrong_phase(phase, self.state.turn.nonce));
        }
        let placed = self.state.player().is_some_and(|player| {
            player.alive && self.state.grid.occupant(player.position) == Some(player.id)
        });
        if !placed {
            return Err(TurnError::PlayerNotPlaced);
        }

        let rules = env.rules()?;
        let limit = (rules.max_enemies as usize).min(GameConfig::MAX_COMBATANTS - 1);
        if enemies.len() > limit {
            return Err(TurnError::TooManyEnemies {
                requested: enemies.len(),
                limit,
            });
        }
        let cells = self.state.grid.spawn_zones(Team::Enemy);
        if cells.len() < enemies.len() {
            return Err(TurnError::NotEnoughSpawnCells {
                requested: enemies.len(),
                available: cells.len(),
            });
        }
        let templates = enemies
            .iter()
            .map(|id| env.archetype(id))
            .collect::<Result<Vec<EnemyArchetype>, _>>()?;

        let mut events = Vec::with_capacity(templates.len() + 2);
        for (template, cell) in templates.iter().zip(cells) {
            let id = self.state.allocate_entity_id();
            self.state.spawn(template.to_combatant(id, cell))?;
            events.push(CombatEvent::EnemySpawned {
                entity: id,
                archetype: template.id.clone(),
                position: cell,
            });
        }

        let turn = &mut self.state.turn;
        turn.order.clear();
        turn.order.push(EntityId::PLAYER);
        for enemy in self.state.combatants.living_on(Team::Enemy) {
            if turn.order.try_push(enemy.id).is_err() {
                break;
            }
        }
        turn.round = 1;
        turn.actor_index = 0;
        events.push(self.enter_phase(Phase::Playing));

        self.start_turn(EntityId::PLAYER);
        events.push(CombatEvent::TurnChanged {
            round: 1,
            actor: EntityId::PLAYER,
        });
        events.extend(self.check_end_condition());
        Ok(events)
    }

    /// Ends the current turn and starts the next living combatant's.
    pub fn advance_turn(&mut self) -> Result<Vec<CombatEvent>, TurnError> {
        let phase = self.state.turn.phase;
        if phase != Phase::Playing {
            return Err(TurnError::wrong_phase(phase, self.state.turn.nonce));
        }
        if let Some(current) = self.current_actor() {
            self.end_turn(current);
        }

        let len = self.state.turn.order.len();
        for _ in 0..len {
            let turn = &mut self.state.turn;
            turn.actor_index += 1;
            if turn.actor_index >= len {
                turn.actor_index = 0;
                turn.round += 1;
            }
            let next = turn.order[turn.actor_index];
            if self.state.combatants.is_alive(next) {
                self.start_turn(next);
                return Ok(vec![CombatEvent::TurnChanged {
                    round: self.state.turn.round,
                    actor: next,
                }]);
            }
        }
        Err(TurnError::NoLivingActor)
    }

    /// Voluntary end of turn requested by `actor`.
    pub fn pass_turn(&mut self, actor: EntityId) -> Result<Vec<CombatEvent>, TurnError> {
        let phase = self.state.turn.phase;
        if phase != Phase::Playing {
            return Err(TurnError::wrong_phase(phase, self.state.turn.nonce));
        }
        let current = self.current_actor();
        if current != Some(actor) {
            return Err(TurnError::NotYourTurn {
                actor,
                current,
                context: ErrorContext::new(self.state.turn.nonce).with_actor(actor),
            });
        }
        self.advance_turn()
    }

    /// Resets AP/MP; player-controlled combatants also tick their cooldowns.
    fn start_turn(&mut self, id: EntityId) {
        if let Some(combatant) = self.state.combatant_mut(id) {
            combatant.refill_turn_resources();
            if combatant.is_player_controlled() {
                combatant.tick_cooldowns();
            }
        }
    }

    /// Clears turn-scoped flags only.
    fn end_turn(&mut self, id: EntityId) {
        if let Some(combatant) = self.state.combatant_mut(id) {
            combatant.flags = TurnFlags::empty();
        }
    }

    fn enter_phase(&mut self, to: Phase) -> CombatEvent {
        let from = self.state.turn.phase;
        self.state.turn.phase = to;
        CombatEvent::PhaseChanged { from, to }
    }

    /// `Defeat` when the player is dead, else `Victory` when no enemy is
    /// left standing. Only evaluated while playing.
    pub fn check_end_condition(&mut self) -> Option<CombatEvent> {
        if self.state.turn.phase != Phase::Playing {
            return None;
        }
        let player_alive = self.state.player().is_some_and(|player| player.alive);
        if !player_alive {
            return Some(self.enter_phase(Phase::Defeat));
        }
        let enemies_left = self.state.combatants.living_on(Team::Enemy).next().is_some();
        if !enemies_left {
            return Some(self.enter_phase(Phase::Victory));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnemyArchetype;
    use crate::grid::Grid;
    use crate::state::{CombatState, Position};
    use crate::testing::{TestOracles, player_at};

    fn positioning() -> CombatState {
        let grid = Grid::from_rows(&["P....", ".....", "...EE", "....E"]).unwrap();
        let mut state = CombatState::new(grid, 11);
        state.spawn(player_at(Position::new(0, 0))).unwrap();
        state
    }

    fn oracles() -> TestOracles {
        TestOracles::new().with_archetype(EnemyArchetype::new("rat", "Rat", 10, 4, 2))
    }

    fn rats(count: usize) -> Vec<ArchetypeId> {
        vec![ArchetypeId::new("rat"); count]
    }

    #[test]
    fn ready_spawns_enemies_and_starts_with_the_player() {
        let oracles = oracles();
        let mut state = positioning();
        let mut engine = GameEngine::new(&mut state);

        let events = engine.ready(&oracles.env(), &rats(2)).unwrap();

        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(engine.current_actor(), Some(EntityId::PLAYER));
        assert_eq!(
            events.iter().filter(|e| matches!(e, CombatEvent::EnemySpawned { .. })).count(),
            2
        );
        assert_eq!(state.turn.order.as_slice(), &[EntityId(0), EntityId(1), EntityId(2)]);
        assert_eq!(state.combatant(EntityId(1)).unwrap().position, Position::new(3, 2));
        assert_eq!(state.combatant(EntityId(2)).unwrap().position, Position::new(4, 2));
    }

    #[test]
    fn ready_checks_everything_before_spawning() {
        let oracles = oracles();
        let mut state = positioning();
        let before = state.clone();
        let mut engine = GameEngine::new(&mut state);

        let err = engine.ready(&oracles.env(), &rats(4)).unwrap_err();
        assert_eq!(err, TurnError::NotEnoughSpawnCells { requested: 4, available: 3 });

        let mut unknown = rats(1);
        unknown.push(ArchetypeId::new("dragon"));
        assert!(matches!(
            engine.ready(&oracles.env(), &unknown),
            Err(TurnError::Oracle(OracleError::ArchetypeNotFound(_)))
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn ready_twice_is_wrong_phase() {
        let oracles = oracles();
        let mut state = positioning();
        let mut engine = GameEngine::new(&mut state);
        engine.ready(&oracles.env(), &rats(1)).unwrap();

        let err = engine.ready(&oracles.env(), &rats(1)).unwrap_err();
        assert_eq!(err.refusal(), Some(RefusalKind::WrongPhase));
    }

    #[test]
    fn advance_skips_dead_combatants_and_wraps_rounds() {
        let oracles = oracles();
        let mut state = positioning();
        {
            let mut engine = GameEngine::new(&mut state);
            engine.ready(&oracles.env(), &rats(3)).unwrap();
        }
        state.combatant_mut(EntityId(2)).unwrap().alive = false;
        let cell = state.combatant(EntityId(2)).unwrap().position;
        state.grid.release(cell, EntityId(2)).unwrap();

        let mut engine = GameEngine::new(&mut state);
        let mut seen = Vec::new();
        for _ in 0..4 {
            engine.advance_turn().unwrap();
            seen.push(engine.current_actor().unwrap());
        }
        assert_eq!(seen, vec![EntityId(1), EntityId(3), EntityId(0), EntityId(1)]);
        assert_eq!(state.turn.round, 2);
    }

    #[test]
    fn start_turn_refills_and_ticks_player_cooldowns() {
        let oracles = oracles();
        let mut state = positioning();
        {
            let mut engine = GameEngine::new(&mut state);
            engine.ready(&oracles.env(), &rats(1)).unwrap();
        }
        let player = state.combatant_mut(EntityId::PLAYER).unwrap();
        player.action_points.debit(5);
        player.flags.insert(TurnFlags::CAST);
        player.spells.push(crate::state::SpellSlot {
            spell: crate::combat::SpellId::new("bolt"),
            level: 1,
            cooldown: 2,
        });

        let mut engine = GameEngine::new(&mut state);
        engine.advance_turn().unwrap();
        assert!(engine.state().player().unwrap().flags.is_empty());
        engine.advance_turn().unwrap();

        let player = state.player().unwrap();
        assert_eq!(player.action_points.current, player.action_points.maximum);
        assert_eq!(player.spells[0].cooldown, 1);
    }

    #[test]
    fn pass_turn_requires_the_current_actor() {
        let oracles = oracles();
        let mut state = positioning();
        let mut engine = GameEngine::new(&mut state);
        engine.ready(&oracles.env(), &rats(1)).unwrap();

        let err = engine.pass_turn(EntityId(1)).unwrap_err();
        assert_eq!(err.refusal(), Some(RefusalKind::NotYourTurn));
        engine.pass_turn(EntityId::PLAYER).unwrap();
        assert_eq!(engine.current_actor(), Some(EntityId(1)));
    }

    #[test]
    fn killing_the_last_enemy_is_victory_and_dead_player_is_defeat() {
        let oracles = oracles();
        let mut state = positioning();
        {
            let mut engine = GameEngine::new(&mut state);
            engine.ready(&oracles.env(), &rats(1)).unwrap();
        }
        let mut won = state.clone();
        won.combatant_mut(EntityId(1)).unwrap().alive = false;
        assert_eq!(
            GameEngine::new(&mut won).check_end_condition(),
            Some(CombatEvent::PhaseChanged {
                from: Phase::Playing,
                to: Phase::Victory
            })
        );
        assert!(GameEngine::new(&mut won).advance_turn().is_err());

        state.combatant_mut(EntityId::PLAYER).unwrap().alive = false;
        let mut engine = GameEngine::new(&mut state);
        engine.check_end_condition();
        assert_eq!(engine.phase(), Phase::Defeat);
    }
}

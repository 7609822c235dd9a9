//! Combat sessions.
//!
//! A [`CombatSession`] bundles everything one fight needs: the character
//! that entered it, the encounter definition and the live [`CombatState`].
//! It is a plain value, so the runtime can persist it between requests and
//! hand it back unchanged.

use core::fmt;

use crate::config::GameConfig;
use crate::engine::{GameEngine, TurnError};
use crate::env::{CharacterSheet, EnemyArchetype, GameEnv, OracleError, RollStream};
use crate::events::CombatEvent;
use crate::grid::{Grid, GridError};
use crate::loot::{DropResult, LootResolver};
use crate::progression::{ExperienceCurve, Progression, StatSnapshot};
use crate::state::{
    ArchetypeId, CombatState, CombatantState, EntityId, InitializationError, Phase, Team,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Battlefield layout and the enemies that will spawn on it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub id: String,
    pub name: String,
    /// ASCII rows, see [`Grid::from_rows`].
    pub layout: Vec<String>,
    pub enemies: Vec<ArchetypeId>,
}

impl Encounter {
    pub fn grid(&self) -> Result<Grid, GridError> {
        Grid::from_rows(self.layout.as_slice())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid encounter layout: {0}")]
    Layout(#[from] GridError),

    #[error("encounter has no free player spawn cell")]
    NoPlayerSpawnCell,

    #[error(transparent)]
    Initialization(#[from] InitializationError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("combat is still in the {0} phase")]
    NotFinished(Phase),

    #[error("player combatant missing from the session")]
    MissingPlayer,

    #[error("failed to encode session: {0}")]
    Encode(String),

    #[error("failed to decode session: {0}")]
    Decode(String),
}

/// What the persistence collaborator receives once a fight is over.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatReport {
    pub session: SessionId,
    pub encounter: String,
    pub outcome: Phase,
    pub rounds: u32,
    pub experience_gained: u64,
    pub leveled_up: bool,
    pub drops: DropResult,
    pub snapshot: StatSnapshot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    pub id: SessionId,
    pub character: CharacterSheet,
    pub encounter: Encounter,
    pub state: CombatState,
}

impl CombatSession {
    /// Builds the battlefield and places the player on the first free
    /// player spawn cell. Combat starts in the positioning phase.
    pub fn create(
        id: SessionId,
        character: CharacterSheet,
        encounter: Encounter,
        seed: u64,
    ) -> Result<Self, SessionError> {
        let grid = encounter.grid()?;
        let cell = grid
            .spawn_zones(Team::Player)
            .first()
            .copied()
            .ok_or(SessionError::NoPlayerSpawnCell)?;
        let mut state = CombatState::new(grid, seed);
        state.spawn(character.to_combatant(cell))?;
        Ok(Self {
            id,
            character,
            encounter,
            state,
        })
    }

    pub fn engine(&mut self) -> GameEngine<'_> {
        GameEngine::new(&mut self.state)
    }

    pub fn phase(&self) -> Phase {
        self.state.turn.phase
    }

    pub fn player(&self) -> Option<&CombatantState> {
        self.state.player()
    }

    /// Ends positioning and spawns the encounter's enemies.
    pub fn ready(&mut self, env: &GameEnv<'_>) -> Result<Vec<CombatEvent>, TurnError> {
        let enemies = self.encounter.enemies.clone();
        self.engine().ready(env, &enemies)
    }

    /// Archetypes of every enemy that died in this fight.
    pub fn defeated(&self) -> impl Iterator<Item = &ArchetypeId> + '_ {
        self.state
            .combatants
            .iter()
            .filter(|combatant| combatant.team == Team::Enemy && !combatant.alive)
            .filter_map(|combatant| combatant.kind.archetype())
    }

    /// Resolves experience and loot of a finished fight.
    ///
    /// Defeat yields no experience and no loot; the snapshot still records
    /// the HP the player was left with.
    pub fn conclude(&self, env: &GameEnv<'_>) -> Result<CombatReport, SessionError> {
        let outcome = self.phase();
        if !outcome.is_terminal() {
            return Err(SessionError::NotFinished(outcome));
        }
        let player = self.player().ok_or(SessionError::MissingPlayer)?;
        let rules: &GameConfig = env.rules()?;
        let curve = ExperienceCurve::new(rules.experience_curve_base);

        let (experience_gained, drops) = if outcome == Phase::Victory {
            let archetypes = self
                .defeated()
                .map(|id| env.archetype(id))
                .collect::<Result<Vec<EnemyArchetype>, _>>()?;
            let experience = archetypes
                .iter()
                .map(|archetype| u64::from(archetype.experience))
                .sum();
            let tables: Vec<_> = archetypes.iter().map(EnemyArchetype::loot_table).collect();
            let mut rolls = RollStream::new(
                env.rng()?,
                self.state.game_seed,
                self.state.turn.nonce,
                Self::LOOT_STREAM.0,
            );
            let drops = LootResolver::resolve(
                tables.iter().map(|table| &**table),
                self.character.prospection,
                &mut rolls,
            );
            (experience, drops)
        } else {
            (0, DropResult::default())
        };

        let progression = Progression::grant(&self.character, player, experience_gained, curve);
        Ok(CombatReport {
            session: self.id,
            encounter: self.encounter.id.clone(),
            outcome,
            rounds: self.state.turn.round,
            experience_gained,
            leveled_up: progression.leveled_up(),
            drops,
            snapshot: progression.snapshot,
        })
    }

    /// Pseudo-actor whose roll stream feeds loot resolution.
    const LOOT_STREAM: EntityId = EntityId(u32::MAX);
}

#[cfg(feature = "serde")]
impl CombatSession {
    pub fn to_bytes(&self) -> Result<Vec<u8>, SessionError> {
        bincode::serialize(self).map_err(|error| SessionError::Encode(error.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SessionError> {
        bincode::deserialize(bytes).map_err(|error| SessionError::Decode(error.to_string()))
    }
}

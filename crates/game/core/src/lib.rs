//! Deterministic tactical combat rules shared across clients.
//!
//! `game-core` defines the canonical rules (grid, actions, damage, turn
//! scheduling, enemy AI, loot) and exposes pure APIs reused by the runtime
//! and offline tools. All state mutation flows through
//! [`engine::GameEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod grid;
pub mod loot;
pub mod progression;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

pub use action::{
    Action, ActionResult, ActionTransition, ActorError, AttackError, AttackOutcome,
    BasicAttackAction, CastError, CastOutcome, CastSpellAction, MoveAction, MoveError,
    MoveOutcome, PlaceAction, PlaceOutcome, PlacementError,
};
pub use ai::EnemyAi;
pub use combat::{
    DamageRange, DamageResolver, EffectShape, Element, HitReport, Spell, SpellError, SpellId,
};
pub use config::GameConfig;
pub use engine::{
    ExecuteError, ExecutionOutcome, GameEngine, TimerKind, TransitionPhase, TransitionPhaseError,
    TurnError, TurnTimer,
};
pub use env::{
    ArchetypeOracle, CharacterOracle, CharacterSheet, ConfigOracle, EnemyArchetype, Env, GameEnv,
    KnownSpell, OracleError, PcgRng, RngOracle, RollStream, SpellOracle,
};
pub use error::{ErrorContext, ErrorSeverity, GameError, Refusal, RefusalKind};
pub use events::CombatEvent;
pub use grid::{Cell, Grid, GridError, GridTransform, TerrainKind, WorldPoint};
pub use loot::{
    AmountRange, ArchetypeTier, CurrencyRule, DropResult, ItemDrop, ItemId, ItemRule,
    LootCategory, LootEntry, LootResolver, LootTable,
};
pub use progression::{ExperienceCurve, Progression, StatSnapshot};
pub use session::{CombatReport, CombatSession, Encounter, SessionError, SessionId};
pub use state::{
    ArchetypeId, CharacterId, CombatState, CombatStats, CombatantKind, CombatantState, EntityId,
    InitializationError, Phase, Position, ResourceMeter, Team,
};

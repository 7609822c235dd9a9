//! Presentation events.
//!
//! The engine reports everything observable as [`CombatEvent`] values. The
//! runtime forwards them to its event bus; renderers and logs subscribe
//! there and never read combat state directly.

use crate::action::{ActionResult, AttackOutcome, CastOutcome, MoveOutcome, PlaceOutcome};
use crate::combat::{HitReport, SpellId};
use crate::state::{ArchetypeId, EntityId, Phase, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    TurnChanged {
        round: u32,
        actor: EntityId,
    },
    EnemySpawned {
        entity: EntityId,
        archetype: ArchetypeId,
        position: Position,
    },
    EntityPlaced {
        entity: EntityId,
        from: Position,
        to: Position,
    },
    EntityMoved {
        entity: EntityId,
        path: Vec<Position>,
        cost: u32,
    },
    SpellCast {
        caster: EntityId,
        spell: SpellId,
        level: u8,
        target: Position,
    },
    DamageApplied {
        source: EntityId,
        target: EntityId,
        amount: u32,
        remaining_hp: u32,
    },
    CombatantDied {
        entity: EntityId,
        position: Position,
    },
    /// Final event of a session: `outcome` is `Victory` or `Defeat`.
    SessionEnded {
        outcome: Phase,
    },
}

impl CombatEvent {
    /// Events describing one executed action.
    pub fn from_action(actor: EntityId, result: &ActionResult) -> Vec<CombatEvent> {
        match result {
            ActionResult::Placed(PlaceOutcome { from, to }) => vec![CombatEvent::EntityPlaced {
                entity: actor,
                from: *from,
                to: *to,
            }],
            ActionResult::Moved(MoveOutcome { path, cost, .. }) => {
                vec![CombatEvent::EntityMoved {
                    entity: actor,
                    path: path.clone(),
                    cost: *cost,
                }]
            }
            ActionResult::Attacked(AttackOutcome { hit, .. }) => hit_events(actor, [hit]),
            ActionResult::Cast(outcome) => {
                let CastOutcome {
                    spell,
                    level,
                    target,
                    hits,
                    ..
                } = outcome;
                let mut events = vec![CombatEvent::SpellCast {
                    caster: actor,
                    spell: spell.clone(),
                    level: *level,
                    target: *target,
                }];
                events.extend(hit_events(actor, hits));
                events
            }
        }
    }
}

fn hit_events<'h>(
    source: EntityId,
    hits: impl IntoIterator<Item = &'h HitReport>,
) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    let mut deaths = Vec::new();
    for hit in hits {
        events.push(CombatEvent::DamageApplied {
            source,
            target: hit.target,
            amount: hit.damage,
            remaining_hp: hit.remaining_hp,
        });
        if hit.killed {
            deaths.push(CombatEvent::CombatantDied {
                entity: hit.target,
                position: hit.position,
            });
        }
    }
    events.extend(deaths);
    events
}

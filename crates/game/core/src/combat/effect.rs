//! Effect geometry and atomic hit application.
//!
//! Every [`EffectShape`] is interpreted here. Applying an effect is split in
//! two steps: [`plan_hits`] computes the damage for every affected occupant
//! against the untouched state, then [`apply_hits`] debits HP and clears the
//! cells of the dead. No target ever sees damage computed from a partially
//! updated state.

use super::{DamageResolver, EffectShape, Element, apply_falloff};
use crate::error::{ErrorSeverity, GameError};
use crate::grid::{Grid, GridError};
use crate::state::{CombatState, CombatStats, EntityId, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectError {
    #[error("combatant {0} missing from the arena")]
    MissingCombatant(EntityId),

    #[error("failed to free a dead combatant's cell: {0}")]
    Grid(#[from] GridError),
}

impl GameError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCombatant(_) => "EFFECT_MISSING_COMBATANT",
            Self::Grid(_) => "EFFECT_GRID_DESYNC",
        }
    }
}

/// Damage about to land on one combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    pub target: EntityId,
    pub position: Position,
    pub damage: u32,
}

/// What a hit actually did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitReport {
    pub target: EntityId,
    pub position: Position,
    pub damage: u32,
    pub remaining_hp: u32,
    pub killed: bool,
}

/// In-bounds cells touched by `shape` around `center`, each with its
/// Manhattan step count from the centre.
pub fn affected_cells(shape: EffectShape, center: Position, grid: &Grid) -> Vec<(Position, u32)> {
    match shape {
        EffectShape::Single => grid
            .contains(center)
            .then_some((center, 0))
            .into_iter()
            .collect(),
        EffectShape::Square { radius, .. } => {
            let radius = radius as i32;
            let mut cells = Vec::new();
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let cell = Position::new(center.x + dx, center.y + dy);
                    if grid.contains(cell) {
                        cells.push((cell, center.distance(cell)));
                    }
                }
            }
            cells
        }
        EffectShape::Rectangle { width, height } => {
            let mut cells = Vec::new();
            for dy in 0..height as i32 {
                for dx in 0..width as i32 {
                    let cell = Position::new(center.x + dx, center.y + dy);
                    if grid.contains(cell) {
                        cells.push((cell, 0));
                    }
                }
            }
            cells
        }
    }
}

/// Computes the damage of one effect against every living occupant it
/// touches. Reads the state only.
pub fn plan_hits(
    state: &CombatState,
    caster: &CombatStats,
    element: Element,
    rolled: u32,
    shape: EffectShape,
    center: Position,
) -> Vec<Hit> {
    let falloff = match shape {
        EffectShape::Square {
            falloff_percent, ..
        } => falloff_percent,
        _ => 0,
    };

    affected_cells(shape, center, &state.grid)
        .into_iter()
        .filter_map(|(position, steps)| {
            let target = state.living_occupant(position)?;
            let damage = DamageResolver::resolve(rolled, caster, element, Some(&target.stats));
            Some(Hit {
                target: target.id,
                position,
                damage: apply_falloff(damage, falloff, steps),
            })
        })
        .collect()
}

/// Applies planned hits. Combatants reaching 0 HP are flagged dead and
/// release their cell.
pub fn apply_hits(state: &mut CombatState, hits: &[Hit]) -> Result<Vec<HitReport>, EffectError> {
    let mut reports = Vec::with_capacity(hits.len());
    for hit in hits {
        let combatant = state
            .combatant_mut(hit.target)
            .ok_or(EffectError::MissingCombatant(hit.target))?;
        let dealt = combatant.take_damage(hit.damage);
        let remaining_hp = combatant.hp.current;
        let killed = !combatant.alive;
        let position = combatant.position;
        if killed {
            state.grid.release(position, hit.target)?;
        }
        reports.push(HitReport {
            target: hit.target,
            position,
            damage: dealt,
            remaining_hp,
            killed,
        });
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ArchetypeId, CombatantKind, CombatantState};

    fn enemy(id: u32, position: Position, hp: u32) -> CombatantState {
        CombatantState::new(
            EntityId(id),
            "dummy",
            CombatantKind::Enemy {
                archetype: ArchetypeId::new("dummy"),
            },
            position,
            hp,
            6,
            3,
        )
    }

    #[test]
    fn square_is_clipped_to_the_grid() {
        let grid = Grid::new(5, 5);
        let shape = EffectShape::Square {
            radius: 1,
            falloff_percent: 0,
        };
        assert_eq!(affected_cells(shape, Position::new(2, 2), &grid).len(), 9);
        assert_eq!(affected_cells(shape, Position::new(0, 0), &grid).len(), 4);
    }

    #[test]
    fn rectangle_is_anchored_top_left() {
        let grid = Grid::new(5, 5);
        let cells: Vec<_> = affected_cells(
            EffectShape::Rectangle {
                width: 2,
                height: 3,
            },
            Position::new(3, 3),
            &grid,
        )
        .into_iter()
        .map(|(cell, _)| cell)
        .collect();
        assert_eq!(
            cells,
            vec![
                Position::new(3, 3),
                Position::new(4, 3),
                Position::new(3, 4),
                Position::new(4, 4),
            ]
        );
    }

    #[test]
    fn falloff_reduces_damage_by_steps_from_centre() {
        let mut state = CombatState::new(Grid::new(5, 5), 1);
        state.spawn(enemy(1, Position::new(2, 2), 100)).unwrap();
        state.spawn(enemy(2, Position::new(3, 3), 100)).unwrap();

        let hits = plan_hits(
            &state,
            &CombatStats::default(),
            Element::Fire,
            40,
            EffectShape::Square {
                radius: 1,
                falloff_percent: 25,
            },
            Position::new(2, 2),
        );
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].damage, 40);
        assert_eq!(hits[1].damage, 20);
    }

    #[test]
    fn lethal_hits_free_cells() {
        let mut state = CombatState::new(Grid::new(3, 3), 1);
        state.spawn(enemy(1, Position::new(1, 1), 10)).unwrap();

        let hits = plan_hits(
            &state,
            &CombatStats::default(),
            Element::Neutral,
            25,
            EffectShape::Single,
            Position::new(1, 1),
        );
        let reports = apply_hits(&mut state, &hits).unwrap();

        assert_eq!(reports.len(), 1);
        assert!(reports[0].killed);
        assert_eq!(reports[0].damage, 10);
        assert_eq!(state.grid.occupant(Position::new(1, 1)), None);
        assert!(state.occupancy_consistent());
    }

    #[test]
    fn empty_cells_produce_no_hits() {
        let state = CombatState::new(Grid::new(3, 3), 1);
        let hits = plan_hits(
            &state,
            &CombatStats::default(),
            Element::Air,
            10,
            EffectShape::Single,
            Position::new(0, 0),
        );
        assert!(hits.is_empty());
    }
}

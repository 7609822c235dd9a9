//! Scripted player used by the headless simulator.
//!
//! One decision per call, in priority order: cast the first usable spell on
//! the nearest enemy, strike it when adjacent, walk towards it, or end the
//! turn. Spells whose area would reach the player are skipped.

use std::collections::BTreeMap;

use game_core::combat::affected_cells;
use game_core::{
    BasicAttackAction, CombatState, CombatantState, EntityId, GameConfig, Position, Spell,
    SpellId, Team,
};
use runtime::InputRequest;

pub struct Autopilot {
    spells: BTreeMap<SpellId, Spell>,
}

impl Autopilot {
    pub fn new(spells: impl IntoIterator<Item = Spell>) -> Self {
        Self {
            spells: spells
                .into_iter()
                .map(|spell| (spell.id.clone(), spell))
                .collect(),
        }
    }

    /// Next request for the player, or `EndTurn` when nothing is worth doing.
    pub fn decide(&self, state: &CombatState, config: &GameConfig) -> InputRequest {
        let Some(player) = state.player().filter(|player| player.alive) else {
            return InputRequest::EndTurn;
        };
        let Some(target) = nearest_enemy(state, player.position) else {
            return InputRequest::EndTurn;
        };

        if let Some(spell) = self.usable_spell(state, player, target) {
            return InputRequest::CastAt {
                spell,
                target: target.position,
            };
        }

        let distance = player.position.distance(target.position);
        if distance == BasicAttackAction::RANGE
            && player.action_points.has(config.basic_attack_cost)
        {
            return InputRequest::Attack(target.position);
        }

        if distance > BasicAttackAction::RANGE && !player.movement_points.is_empty() {
            let step = state
                .grid
                .reachable(player.position, player.movement_points.current)
                .into_iter()
                .min_by_key(|&(cell, cost)| (cell.distance(target.position), cost, cell))
                .filter(|&(cell, _)| cell.distance(target.position) < distance);
            if let Some((cell, _)) = step {
                return InputRequest::MoveTo(cell);
            }
        }

        InputRequest::EndTurn
    }

    fn usable_spell(
        &self,
        state: &CombatState,
        player: &CombatantState,
        target: &CombatantState,
    ) -> Option<SpellId> {
        player
            .spells
            .iter()
            .filter(|slot| slot.is_ready())
            .filter_map(|slot| self.spells.get(&slot.spell))
            .find(|spell| {
                player.action_points.has(spell.ap_cost)
                    && spell.in_range(player.position, target.position)
                    && !affected_cells(spell.shape, target.position, &state.grid)
                        .iter()
                        .any(|&(cell, _)| cell == player.position)
            })
            .map(|spell| spell.id.clone())
    }
}

/// Closest living enemy; ties go to the lowest entity id.
fn nearest_enemy(state: &CombatState, from: Position) -> Option<&CombatantState> {
    state
        .combatants
        .living_on(Team::Enemy)
        .min_by_key(|enemy| (from.distance(enemy.position), enemy.id))
}

/// The combatant whose turn it is, for display.
pub fn actor_name(state: &CombatState, id: EntityId) -> &str {
    state
        .combatant(id)
        .map(|combatant| combatant.name.as_str())
        .unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use game_core::{
        ArchetypeId, CharacterId, CombatantKind, DamageRange, EffectShape, Element, Grid,
    };

    use super::*;

    fn ember() -> Spell {
        Spell::new("ember", "Ember", Element::Fire, DamageRange::new(20, 30), 3, 5)
    }

    fn quake() -> Spell {
        Spell::new("quake", "Quake", Element::Earth, DamageRange::new(10, 14), 4, 4)
        .with_shape(EffectShape::Square {
            radius: 1,
            falloff_percent: 20,
        })
    }

    fn hero(position: Position, spells: &[&str]) -> CombatantState {
        let mut hero = CombatantState::new(
            EntityId::PLAYER,
            "hero",
            CombatantKind::Player {
                character: CharacterId::new("hero"),
            },
            position,
            50,
            6,
            3,
        );
        for spell in spells {
            hero = hero.with_spell(SpellId::new(*spell), 1);
        }
        hero
    }

    fn rat(id: u32, position: Position) -> CombatantState {
        CombatantState::new(
            EntityId(id),
            "rat",
            CombatantKind::Enemy {
                archetype: ArchetypeId::new("rat"),
            },
            position,
            12,
            4,
            3,
        )
    }

    fn state(player: CombatantState, enemies: Vec<CombatantState>) -> CombatState {
        let mut state = CombatState::new(Grid::new(12, 12), 3);
        state.spawn(player).unwrap();
        for enemy in enemies {
            state.spawn(enemy).unwrap();
        }
        state
    }

    #[test]
    fn casts_at_the_nearest_enemy_in_range() {
        let state = state(
            hero(Position::new(0, 0), &["ember"]),
            vec![rat(1, Position::new(6, 0)), rat(2, Position::new(0, 4))],
        );
        let pilot = Autopilot::new([ember()]);
        assert_eq!(
            pilot.decide(&state, &GameConfig::default()),
            InputRequest::cast("ember", Position::new(0, 4))
        );
    }

    #[test]
    fn skips_area_spells_that_would_hit_the_caster() {
        let state = state(
            hero(Position::new(2, 2), &["quake"]),
            vec![rat(1, Position::new(3, 2))],
        );
        let pilot = Autopilot::new([quake()]);
        assert_eq!(
            pilot.decide(&state, &GameConfig::default()),
            InputRequest::Attack(Position::new(3, 2))
        );
    }

    #[test]
    fn spells_on_cooldown_are_ignored() {
        let mut player = hero(Position::new(2, 2), &["ember"]);
        player.spells[0].cooldown = 2;
        let state = state(player, vec![rat(1, Position::new(2, 3))]);
        let pilot = Autopilot::new([ember()]);
        assert_eq!(
            pilot.decide(&state, &GameConfig::default()),
            InputRequest::Attack(Position::new(2, 3))
        );
    }

    #[test]
    fn walks_towards_distant_enemies() {
        let state = state(
            hero(Position::new(0, 0), &[]),
            vec![rat(1, Position::new(8, 0))],
        );
        let pilot = Autopilot::new([]);
        assert_eq!(
            pilot.decide(&state, &GameConfig::default()),
            InputRequest::MoveTo(Position::new(3, 0))
        );
    }

    #[test]
    fn ends_the_turn_when_exhausted() {
        let mut player = hero(Position::new(0, 0), &[]);
        player.movement_points.current = 0;
        player.action_points.current = 0;
        let state = state(player, vec![rat(1, Position::new(5, 5))]);
        assert_eq!(
            Autopilot::new([]).decide(&state, &GameConfig::default()),
            InputRequest::EndTurn
        );
    }
}

//! Plain-text rendering of combat events and the battlefield.

use std::fmt::Write as _;

use game_core::{CombatEvent, CombatReport, CombatState, EntityId, Team, TerrainKind};

use crate::autopilot::actor_name;

pub fn describe(state: &CombatState, event: &CombatEvent) -> String {
    let name = |id: EntityId| actor_name(state, id).to_owned();
    match event {
        CombatEvent::PhaseChanged { from, to } => format!("-- {from} -> {to} --"),
        CombatEvent::TurnChanged { round, actor } => {
            format!("[round {round}] {}'s turn", name(*actor))
        }
        CombatEvent::EnemySpawned {
            entity,
            archetype,
            position,
        } => format!("{} ({archetype}) appears at {position}", name(*entity)),
        CombatEvent::EntityPlaced { entity, to, .. } => {
            format!("{} takes position at {to}", name(*entity))
        }
        CombatEvent::EntityMoved { entity, path, cost } => {
            let destination = path
                .last()
                .map(ToString::to_string)
                .unwrap_or_else(|| "nowhere".to_owned());
            format!("{} moves to {destination} ({cost} MP)", name(*entity))
        }
        CombatEvent::SpellCast {
            caster,
            spell,
            level,
            target,
        } => format!("{} casts {spell} (lvl {level}) at {target}", name(*caster)),
        CombatEvent::DamageApplied {
            source,
            target,
            amount,
            remaining_hp,
        } => format!(
            "{} hits {} for {amount} ({remaining_hp} HP left)",
            name(*source),
            name(*target)
        ),
        CombatEvent::CombatantDied { entity, position } => {
            format!("{} falls at {position}", name(*entity))
        }
        CombatEvent::SessionEnded { outcome } => format!("== {outcome} =="),
    }
}

/// ASCII battlefield: `@` is the player, enemies show the first letter of
/// their name in upper case.
pub fn render(state: &CombatState) -> String {
    let grid = &state.grid;
    let mut out = String::new();
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let position = game_core::Position::new(x, y);
            let glyph = match state.living_occupant(position) {
                Some(combatant) if combatant.team == Team::Player => '@',
                Some(combatant) => combatant
                    .name
                    .chars()
                    .next()
                    .map(|c| c.to_ascii_uppercase())
                    .unwrap_or('E'),
                None => match grid.cell(position).map(|cell| cell.terrain) {
                    Some(TerrainKind::Floor) => '.',
                    Some(TerrainKind::Wall) => '#',
                    Some(TerrainKind::Water) => '~',
                    Some(TerrainKind::Void) | None => ' ',
                },
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

pub fn summary(report: &CombatReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} on '{}' after {} round(s)",
        report.outcome, report.encounter, report.rounds
    );
    let _ = writeln!(
        out,
        "experience +{} (level {}{})",
        report.experience_gained,
        report.snapshot.level,
        if report.leveled_up { ", level up!" } else { "" }
    );
    let _ = writeln!(
        out,
        "hp {}/{}",
        report.snapshot.current_hp, report.snapshot.max_hp
    );
    if report.drops.is_empty() {
        let _ = writeln!(out, "no loot");
    } else {
        let _ = writeln!(out, "currency {}", report.drops.currency);
        for drop in &report.drops.items {
            let _ = writeln!(out, "  {} x{}", drop.item, drop.quantity);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use game_core::{CharacterId, CombatantKind, CombatantState, Grid, Position};

    use super::*;

    fn state() -> CombatState {
        let grid = Grid::from_rows(["P.#", ".~E"].as_slice()).unwrap();
        let mut state = CombatState::new(grid, 0);
        state
            .spawn(CombatantState::new(
                EntityId::PLAYER,
                "hero",
                CombatantKind::Player {
                    character: CharacterId::new("hero"),
                },
                Position::new(0, 0),
                10,
                6,
                3,
            ))
            .unwrap();
        state
    }

    #[test]
    fn renders_terrain_and_occupants() {
        assert_eq!(render(&state()), "@.#\n.~.\n");
    }

    #[test]
    fn damage_lines_name_both_sides() {
        let state = state();
        let line = describe(
            &state,
            &CombatEvent::DamageApplied {
                source: EntityId::PLAYER,
                target: EntityId::PLAYER,
                amount: 4,
                remaining_hp: 6,
            },
        );
        assert_eq!(line, "hero hits hero for 4 (6 HP left)");
    }
}

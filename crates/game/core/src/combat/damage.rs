//! Damage calculation.

use super::Element;
use crate::state::CombatStats;

// ============================================================================
// Damage Resolver
// ============================================================================

/// Layered damage pipeline shared by spells and basic attacks.
///
/// # Formula
///
/// ```text
/// d = base
/// d = floor(d × (100 + characteristic[element]) / 100)
/// d = d + damage_bonus.flat
/// d = floor(d × (100 + damage_bonus.spell_percent) / 100)
/// d = floor(d × (100 + damage_bonus[element]_percent) / 100)
/// if target:
///     d = floor(d × (100 − resistance[element]) / 100)
/// final = max(d, 1)
/// ```
///
/// Multipliers never drop below zero, so a huge negative characteristic or a
/// resistance of 100% or more simply floors the result at the minimum.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamageResolver;

impl DamageResolver {
    /// Minimum damage any hit deals.
    pub const MINIMUM: u32 = 1;

    pub fn resolve(
        base: u32,
        caster: &CombatStats,
        element: Element,
        target: Option<&CombatStats>,
    ) -> u32 {
        let bonus = &caster.damage_bonus;

        let mut damage = i64::from(base);
        damage = scale_percent(damage, caster.characteristics.get(element));
        damage += i64::from(bonus.flat);
        damage = scale_percent(damage, bonus.spell_percent);
        damage = scale_percent(damage, bonus.element_percent(element));
        if let Some(target) = target {
            damage = scale_percent(damage, -target.resistances.get(element));
        }

        damage.clamp(i64::from(Self::MINIMUM), i64::from(u32::MAX)) as u32
    }

    /// Raw basic-attack damage before the pipeline: `max(1, attack − defense + roll)`.
    pub fn basic_attack_base(attacker: &CombatStats, defender: &CombatStats, roll: i32) -> u32 {
        let raw = i64::from(attacker.attack) - i64::from(defender.defense) + i64::from(roll);
        raw.clamp(i64::from(Self::MINIMUM), i64::from(u32::MAX)) as u32
    }

    /// Basic attack resolved through the pipeline with the neutral element.
    pub fn basic_attack(attacker: &CombatStats, defender: &CombatStats, roll: i32) -> u32 {
        let base = Self::basic_attack_base(attacker, defender, roll);
        Self::resolve(base, attacker, Element::Neutral, Some(defender))
    }
}

/// `floor(value × (100 + percent) / 100)` with the multiplier clamped at zero.
fn scale_percent(value: i64, percent: i32) -> i64 {
    let multiplier = (100 + i64::from(percent)).max(0);
    (value * multiplier).div_euclid(100)
}

/// Reduces `damage` by `falloff_percent` per step, never below the minimum.
pub fn apply_falloff(damage: u32, falloff_percent: u32, steps: u32) -> u32 {
    let reduction = u64::from(falloff_percent)
        .saturating_mul(u64::from(steps))
        .min(100);
    let reduced = u64::from(damage) * (100 - reduction) / 100;
    (reduced as u32).max(DamageResolver::MINIMUM)
}

/// Apply damage to current HP, clamped to 0.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

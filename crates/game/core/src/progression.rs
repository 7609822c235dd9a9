//! Experience and level progression.
//!
//! Reaching level `n + 1` takes `experience_curve_base × n²` total
//! experience, so the default base of 100 puts level 2 at 100 XP, level 3
//! at 400 and level 4 at 900.

use crate::env::CharacterSheet;
use crate::state::{CharacterId, CombatantState};

/// Quadratic experience curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExperienceCurve {
    base: u32,
}

impl ExperienceCurve {
    pub const MAX_LEVEL: u32 = 200;

    pub const fn new(base: u32) -> Self {
        Self { base }
    }

    /// Total experience needed to leave `level` for the next one.
    pub fn threshold(&self, level: u32) -> u64 {
        u64::from(self.base).saturating_mul(u64::from(level).saturating_mul(u64::from(level)))
    }

    /// Level reached with `total` experience, never below `floor`.
    pub fn level_for(&self, total: u64, floor: u32) -> u32 {
        let mut level = floor.clamp(1, Self::MAX_LEVEL);
        if self.base == 0 {
            return level;
        }
        while level < Self::MAX_LEVEL && total >= self.threshold(level) {
            level += 1;
        }
        level
    }
}

/// Character values persisted after a fight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSnapshot {
    pub character: CharacterId,
    pub level: u32,
    pub experience: u64,
    pub current_hp: u32,
    pub max_hp: u32,
}

impl StatSnapshot {
    /// Writes the snapshot back onto a character sheet.
    pub fn apply_to(&self, sheet: &mut CharacterSheet) {
        sheet.level = self.level;
        sheet.experience = self.experience;
        sheet.current_hp = Some(self.current_hp);
        sheet.max_hp = self.max_hp;
    }
}

/// Result of granting experience.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progression {
    pub snapshot: StatSnapshot,
    pub levels_gained: u32,
}

impl Progression {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }

    /// Grants `gained` experience to the character that fought as `player`.
    pub fn grant(
        sheet: &CharacterSheet,
        player: &CombatantState,
        gained: u64,
        curve: ExperienceCurve,
    ) -> Self {
        let experience = sheet.experience.saturating_add(gained);
        let level = curve.level_for(experience, sheet.level);
        Self {
            snapshot: StatSnapshot {
                character: sheet.id.clone(),
                level,
                experience,
                current_hp: player.hp.current,
                max_hp: player.hp.maximum,
            },
            levels_gained: level.saturating_sub(sheet.level.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Position;

    #[test]
    fn curve_is_quadratic() {
        let curve = ExperienceCurve::new(100);
        assert_eq!(curve.threshold(1), 100);
        assert_eq!(curve.threshold(3), 900);
        assert_eq!(curve.level_for(0, 1), 1);
        assert_eq!(curve.level_for(99, 1), 1);
        assert_eq!(curve.level_for(100, 1), 2);
        assert_eq!(curve.level_for(400, 1), 3);
        assert_eq!(curve.level_for(0, 4), 4);
    }

    #[test]
    fn grant_levels_up_and_keeps_current_hp() {
        let mut sheet = CharacterSheet::new("hero", "Hero", 60, 6, 3);
        sheet.experience = 80;
        let mut player = sheet.to_combatant(Position::ORIGIN);
        player.take_damage(25);

        let progression = Progression::grant(&sheet, &player, 350, ExperienceCurve::new(100));

        assert!(progression.leveled_up());
        assert_eq!(progression.levels_gained, 2);
        assert_eq!(progression.snapshot.level, 3);
        assert_eq!(progression.snapshot.experience, 430);
        assert_eq!(progression.snapshot.current_hp, 35);

        progression.snapshot.apply_to(&mut sheet);
        assert_eq!(sheet.current_hp, Some(35));
        assert_eq!(sheet.level, 3);
    }

    #[test]
    fn small_gains_do_not_level() {
        let sheet = CharacterSheet::new("hero", "Hero", 60, 6, 3);
        let player = sheet.to_combatant(Position::ORIGIN);
        let progression = Progression::grant(&sheet, &player, 10, ExperienceCurve::new(100));
        assert!(!progression.leveled_up());
        assert_eq!(progression.snapshot.level, 1);
    }
}

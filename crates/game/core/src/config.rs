use crate::grid::{GridTransform, WorldPoint};

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Ticks a player has to act before the turn is forced to pass.
    pub turn_countdown_ticks: u32,
    /// Ticks an enemy "thinks" before acting.
    pub ai_think_delay_ticks: u32,
    /// Highest level a spell can be learned at.
    pub max_spell_level: u8,
    /// Damage gained per spell level above 1, in percent.
    pub level_scaling_percent: u32,
    /// AP cost of the basic weapon attack.
    pub basic_attack_cost: u32,
    /// Basic attacks roll `uniform(-variance, variance)` on top of attack − defense.
    pub basic_attack_variance: i32,
    /// Pass the turn automatically after every move, attack or cast.
    pub advance_after_action: bool,
    /// Total experience for level `n` is `experience_curve_base × n²`.
    pub experience_curve_base: u32,
    /// Upper bound on enemies spawned into one session.
    pub max_enemies: u32,
    /// World coordinates of the grid's top-left corner.
    pub origin_x: i32,
    pub origin_y: i32,
    /// World units per grid cell.
    pub cell_size: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of combatants in one session (player + enemies).
    pub const MAX_COMBATANTS: usize = 33;
    /// Maximum spells in a spell book.
    pub const MAX_SPELLS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TURN_COUNTDOWN_TICKS: u32 = 30;
    pub const DEFAULT_AI_THINK_DELAY_TICKS: u32 = 2;
    pub const DEFAULT_MAX_SPELL_LEVEL: u8 = 5;
    pub const DEFAULT_LEVEL_SCALING_PERCENT: u32 = 20;
    pub const DEFAULT_BASIC_ATTACK_COST: u32 = 3;
    pub const DEFAULT_BASIC_ATTACK_VARIANCE: i32 = 3;
    pub const DEFAULT_EXPERIENCE_CURVE_BASE: u32 = 100;
    pub const DEFAULT_CELL_SIZE: u32 = 32;
    pub const DEFAULT_MAX_ENEMIES: u32 = (Self::MAX_COMBATANTS - 1) as u32;

    pub fn new() -> Self {
        Self {
            turn_countdown_ticks: Self::DEFAULT_TURN_COUNTDOWN_TICKS,
            ai_think_delay_ticks: Self::DEFAULT_AI_THINK_DELAY_TICKS,
            max_spell_level: Self::DEFAULT_MAX_SPELL_LEVEL,
            level_scaling_percent: Self::DEFAULT_LEVEL_SCALING_PERCENT,
            basic_attack_cost: Self::DEFAULT_BASIC_ATTACK_COST,
            basic_attack_variance: Self::DEFAULT_BASIC_ATTACK_VARIANCE,
            advance_after_action: true,
            experience_curve_base: Self::DEFAULT_EXPERIENCE_CURVE_BASE,
            max_enemies: Self::DEFAULT_MAX_ENEMIES,
            origin_x: 0,
            origin_y: 0,
            cell_size: Self::DEFAULT_CELL_SIZE,
        }
    }

    pub fn with_advance_after_action(mut self, advance: bool) -> Self {
        self.advance_after_action = advance;
        self
    }

    /// World transform derived from the configured cell size.
    pub fn transform(&self) -> GridTransform {
        GridTransform::new(
            WorldPoint::new(self.origin_x as f32, self.origin_y as f32),
            self.cell_size as f32,
        )
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

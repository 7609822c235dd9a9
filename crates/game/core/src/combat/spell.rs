//! Declarative spell templates.

use core::fmt;
use core::str::FromStr;

use super::Element;
use crate::state::Position;

/// Key into the spell catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SpellId(pub String);

impl SpellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellError {
    #[error("spell level {level} outside 1..={max}")]
    LevelOutOfRange { level: u8, max: u8 },

    #[error("invalid damage range {0:?}")]
    InvalidDamageRange(String),
}

// ============================================================================
// Damage Range
// ============================================================================

/// Inclusive damage range, written `min-max` in content files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Applies level scaling to both ends independently.
    ///
    /// `scaled = floor(base × (100 + (level − 1) × scaling_percent) / 100)`
    pub fn scaled(self, level: u8, scaling_percent: u32) -> Self {
        let factor = 100 + u64::from(level.saturating_sub(1)) * u64::from(scaling_percent);
        let scale = |base: u32| (u64::from(base) * factor / 100) as u32;
        Self::new(scale(self.min), scale(self.max))
    }
}

impl fmt::Display for DamageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl FromStr for DamageRange {
    type Err = SpellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SpellError::InvalidDamageRange(s.to_owned());
        let (min, max) = match s.split_once('-') {
            Some((min, max)) => (min.trim(), max.trim()),
            None => (s.trim(), s.trim()),
        };
        let min = min.parse().map_err(|_| invalid())?;
        let max = max.parse().map_err(|_| invalid())?;
        if min > max {
            return Err(invalid());
        }
        Ok(Self::new(min, max))
    }
}

impl TryFrom<String> for DamageRange {
    type Error = SpellError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DamageRange> for String {
    fn from(range: DamageRange) -> Self {
        range.to_string()
    }
}

// ============================================================================
// Effect Shape
// ============================================================================

/// Cells an effect touches, relative to the targeted cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectShape {
    /// Only the targeted cell.
    #[default]
    Single,
    /// Square of side `2 × radius + 1` centred on the target. Damage drops by
    /// `falloff_percent` for every step (Manhattan) away from the centre.
    Square { radius: u32, falloff_percent: u32 },
    /// Fixed rectangle whose top-left corner is the targeted cell.
    Rectangle { width: u32, height: u32 },
}

// ============================================================================
// Spell
// ============================================================================

/// Stateless spell template. Cooldown counters live on the caster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spell {
    pub id: SpellId,
    pub name: String,
    pub ap_cost: u32,
    pub range: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_range: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: Option<u32>,
    pub element: Element,
    pub base_damage: DamageRange,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u8,
    #[cfg_attr(feature = "serde", serde(default = "default_scaling"))]
    pub scaling_percent: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape: EffectShape,
}

#[cfg(feature = "serde")]
fn default_level() -> u8 {
    1
}

#[cfg(feature = "serde")]
fn default_scaling() -> u32 {
    crate::config::GameConfig::DEFAULT_LEVEL_SCALING_PERCENT
}

impl Spell {
    /// Creates a level-1 single-target spell with the default scaling.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        element: Element,
        base_damage: DamageRange,
        ap_cost: u32,
        range: u32,
    ) -> Self {
        Self {
            id: SpellId::new(id),
            name: name.into(),
            ap_cost,
            range,
            min_range: 0,
            cooldown: None,
            element,
            base_damage,
            level: 1,
            scaling_percent: crate::config::GameConfig::DEFAULT_LEVEL_SCALING_PERCENT,
            shape: EffectShape::Single,
        }
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown = Some(turns);
        self
    }

    pub fn with_shape(mut self, shape: EffectShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_min_range(mut self, min_range: u32) -> Self {
        self.min_range = min_range;
        self
    }

    /// Returns this template at `level`, which must lie in `1..=max_level`.
    pub fn at_level(&self, level: u8, max_level: u8) -> Result<Self, SpellError> {
        if level == 0 || level > max_level {
            return Err(SpellError::LevelOutOfRange {
                level,
                max: max_level,
            });
        }
        Ok(Self {
            level,
            ..self.clone()
        })
    }

    /// Base damage after level scaling.
    pub fn damage_range(&self) -> DamageRange {
        self.base_damage.scaled(self.level, self.scaling_percent)
    }

    /// Whether `target` lies within the spell's range band from `caster`.
    pub fn in_range(&self, caster: Position, target: Position) -> bool {
        let distance = caster.distance(target);
        distance >= self.min_range && distance <= self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_three_scales_twenty_thirty_to_twenty_eight_forty_two() {
        let range: DamageRange = "20-30".parse().unwrap();
        assert_eq!(range.scaled(3, 20).to_string(), "28-42");
    }

    #[test]
    fn level_one_is_unscaled() {
        assert_eq!(DamageRange::new(7, 9).scaled(1, 20), DamageRange::new(7, 9));
    }

    #[test]
    fn parses_single_value_and_rejects_inverted_ranges() {
        assert_eq!("12".parse::<DamageRange>().unwrap(), DamageRange::new(12, 12));
        assert!("30-20".parse::<DamageRange>().is_err());
        assert!("abc".parse::<DamageRange>().is_err());
    }

    #[test]
    fn at_level_rejects_levels_outside_bounds() {
        let spell = Spell::new("spark", "Spark", Element::Fire, DamageRange::new(5, 8), 3, 4);
        assert!(spell.at_level(0, 5).is_err());
        assert!(spell.at_level(6, 5).is_err());
        let leveled = spell.at_level(5, 5).unwrap();
        assert_eq!(leveled.level, 5);
        assert_eq!(leveled.damage_range(), DamageRange::new(9, 14));
    }

    #[test]
    fn range_band_honours_minimum() {
        let spell = Spell::new("arrow", "Arrow", Element::Air, DamageRange::new(1, 2), 2, 5)
            .with_min_range(2);
        let origin = Position::new(0, 0);
        assert!(!spell.in_range(origin, Position::new(1, 0)));
        assert!(spell.in_range(origin, Position::new(2, 0)));
        assert!(spell.in_range(origin, Position::new(3, 2)));
        assert!(!spell.in_range(origin, Position::new(3, 3)));
    }
}

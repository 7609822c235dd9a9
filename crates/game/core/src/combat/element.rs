//! Damage elements.

/// Element carried by a spell or attack.
///
/// Each element is boosted by the caster's matching characteristic and
/// reduced by the defender's matching resistance. `Neutral` has a
/// characteristic but no resistance.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    #[default]
    Neutral,
    Earth,
    Fire,
    Water,
    Air,
}

impl Element {
    /// Returns true if defenders can resist this element.
    pub const fn is_resistible(self) -> bool {
        !matches!(self, Element::Neutral)
    }
}

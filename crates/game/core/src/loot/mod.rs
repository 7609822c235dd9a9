//! Weighted-random loot resolution.
//!
//! Loot tables are static per enemy archetype. At victory the orchestrator
//! hands the tables of every defeated enemy to [`LootResolver::resolve`],
//! which consumes rolls from a [`RollStream`] and returns one aggregated
//! [`DropResult`]. Nothing else is touched.

mod tables;

use core::fmt;

pub use tables::ArchetypeTier;

use crate::env::RollStream;

// ============================================================================
// Table Types
// ============================================================================

/// Loot category, rolled independently per defeated combatant.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum LootCategory {
    Currency,
    Resource,
    Equipment,
    Consumable,
}

impl LootCategory {
    /// Roll order used by the resolver.
    pub const ALL: [LootCategory; 4] = [
        LootCategory::Currency,
        LootCategory::Resource,
        LootCategory::Equipment,
        LootCategory::Consumable,
    ];
}

/// Item key handed to the persistence collaborator.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive integer range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmountRange {
    pub min: u32,
    pub max: u32,
}

impl AmountRange {
    pub const ONE: Self = Self { min: 1, max: 1 };

    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

impl Default for AmountRange {
    fn default() -> Self {
        Self::ONE
    }
}

/// Weighted item entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: ItemId,
    pub weight: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub quantity: AmountRange,
}

impl LootEntry {
    pub fn new(item: impl Into<String>, weight: u32) -> Self {
        Self {
            item: ItemId::new(item),
            weight,
            quantity: AmountRange::ONE,
        }
    }

    pub fn with_quantity(mut self, min: u32, max: u32) -> Self {
        self.quantity = AmountRange::new(min, max);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrencyRule {
    pub chance_percent: u32,
    pub amount: AmountRange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRule {
    pub chance_percent: u32,
    pub entries: Vec<LootEntry>,
}

/// Per-category drop rules for one archetype. Missing categories never drop.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LootTable {
    pub currency: Option<CurrencyRule>,
    pub resource: Option<ItemRule>,
    pub equipment: Option<ItemRule>,
    pub consumable: Option<ItemRule>,
}

impl LootTable {
    fn item_rule(&self, category: LootCategory) -> Option<&ItemRule> {
        match category {
            LootCategory::Currency => None,
            LootCategory::Resource => self.resource.as_ref(),
            LootCategory::Equipment => self.equipment.as_ref(),
            LootCategory::Consumable => self.consumable.as_ref(),
        }
    }

    /// Configured base chance of a category, 0 when absent.
    pub fn base_chance(&self, category: LootCategory) -> u32 {
        match category {
            LootCategory::Currency => self.currency.as_ref().map_or(0, |rule| rule.chance_percent),
            _ => self.item_rule(category).map_or(0, |rule| rule.chance_percent),
        }
    }
}

// ============================================================================
// Drop Result
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDrop {
    pub item: ItemId,
    pub quantity: u32,
}

/// Aggregated loot of one victory.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropResult {
    pub currency: u64,
    pub items: Vec<ItemDrop>,
}

impl DropResult {
    pub fn is_empty(&self) -> bool {
        self.currency == 0 && self.items.is_empty()
    }

    /// Adds `quantity` of `item`, merging with an earlier drop of the same id.
    pub fn add_item(&mut self, item: ItemId, quantity: u32) {
        match self.items.iter_mut().find(|drop| drop.item == item) {
            Some(drop) => drop.quantity = drop.quantity.saturating_add(quantity),
            None => self.items.push(ItemDrop { item, quantity }),
        }
    }

    pub fn quantity_of(&self, item: &ItemId) -> u32 {
        self.items
            .iter()
            .find(|drop| &drop.item == item)
            .map_or(0, |drop| drop.quantity)
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Stateless loot resolver.
#[derive(Clone, Copy, Debug, Default)]
pub struct LootResolver;

impl LootResolver {
    /// `min(100, base × prospection / 100)`.
    pub fn effective_chance(base_chance: u32, prospection_percent: u32) -> u32 {
        let scaled = u64::from(base_chance) * u64::from(prospection_percent) / 100;
        scaled.min(100) as u32
    }

    /// One success check: a d100 roll at or under the effective chance.
    pub fn roll_category(
        base_chance: u32,
        prospection_percent: u32,
        rolls: &mut RollStream<'_>,
    ) -> bool {
        let effective = Self::effective_chance(base_chance, prospection_percent);
        effective > 0 && rolls.d100() <= effective
    }

    /// Picks one entry by cumulative weight. Zero-weight entries never win.
    pub fn pick_weighted<'t>(
        entries: &'t [LootEntry],
        rolls: &mut RollStream<'_>,
    ) -> Option<&'t LootEntry> {
        let total: u64 = entries.iter().map(|entry| u64::from(entry.weight)).sum();
        if total == 0 {
            return None;
        }
        let target = u64::from(rolls.range(0, (total - 1).min(u64::from(u32::MAX)) as u32));
        let mut cumulative = 0u64;
        entries.iter().find(|entry| {
            cumulative += u64::from(entry.weight);
            target < cumulative
        })
    }

    /// Rolls every category of every table and aggregates the results.
    pub fn resolve<'t>(
        tables: impl IntoIterator<Item = &'t LootTable>,
        prospection_percent: u32,
        rolls: &mut RollStream<'_>,
    ) -> DropResult {
        let mut result = DropResult::default();

        for table in tables {
            if let Some(rule) = &table.currency
                && Self::roll_category(rule.chance_percent, prospection_percent, rolls)
            {
                let amount = rolls.range(rule.amount.min, rule.amount.max);
                result.currency = result.currency.saturating_add(u64::from(amount));
            }

            for category in [
                LootCategory::Resource,
                LootCategory::Equipment,
                LootCategory::Consumable,
            ] {
                let Some(rule) = table.item_rule(category) else {
                    continue;
                };
                if !Self::roll_category(rule.chance_percent, prospection_percent, rolls) {
                    continue;
                }
                if let Some(entry) = Self::pick_weighted(&rule.entries, rolls) {
                    let quantity = rolls.range(entry.quantity.min, entry.quantity.max);
                    if quantity > 0 {
                        result.add_item(entry.item.clone(), quantity);
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    #[test]
    fn effective_chance_is_capped_at_one_hundred() {
        assert_eq!(LootResolver::effective_chance(40, 100), 40);
        assert_eq!(LootResolver::effective_chance(40, 150), 60);
        assert_eq!(LootResolver::effective_chance(40, 300), 100);
        assert_eq!(LootResolver::effective_chance(90, 1_000_000), 100);
        assert_eq!(LootResolver::effective_chance(40, 0), 0);
    }

    #[test]
    fn zero_chance_never_drops_and_full_chance_always_drops() {
        let rng = PcgRng;
        let mut rolls = RollStream::new(&rng, 9, 0, 0);
        for _ in 0..1_000 {
            assert!(!LootResolver::roll_category(0, 500, &mut rolls));
            assert!(LootResolver::roll_category(100, 100, &mut rolls));
        }
    }

    #[test]
    fn weighted_pick_skips_zero_weights() {
        let rng = PcgRng;
        let mut rolls = RollStream::new(&rng, 3, 0, 0);
        let entries = vec![LootEntry::new("never", 0), LootEntry::new("always", 5)];
        for _ in 0..200 {
            let entry = LootResolver::pick_weighted(&entries, &mut rolls).unwrap();
            assert_eq!(entry.item, ItemId::new("always"));
        }
        assert!(LootResolver::pick_weighted(&[], &mut rolls).is_none());
    }

    #[test]
    fn weighted_pick_follows_weights() {
        let rng = PcgRng;
        let mut rolls = RollStream::new(&rng, 11, 0, 0);
        let entries = vec![LootEntry::new("common", 3), LootEntry::new("rare", 1)];
        let trials = 20_000;
        let rare = (0..trials)
            .filter(|_| {
                LootResolver::pick_weighted(&entries, &mut rolls)
                    .is_some_and(|entry| entry.item == ItemId::new("rare"))
            })
            .count();
        let rate = rare as f64 / trials as f64;
        assert!((rate - 0.25).abs() < 0.02, "rare rate {rate}");
    }

    #[test]
    fn results_aggregate_across_combatants() {
        let table = LootTable {
            currency: Some(CurrencyRule {
                chance_percent: 100,
                amount: AmountRange::new(10, 10),
            }),
            resource: Some(ItemRule {
                chance_percent: 100,
                entries: vec![LootEntry::new("bone", 1).with_quantity(2, 2)],
            }),
            ..LootTable::default()
        };
        let rng = PcgRng;
        let mut rolls = RollStream::new(&rng, 5, 0, 0);
        let result = LootResolver::resolve([&table, &table, &table], 100, &mut rolls);

        assert_eq!(result.currency, 30);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.quantity_of(&ItemId::new("bone")), 6);
    }

    #[test]
    fn empty_tables_yield_empty_result() {
        let rng = PcgRng;
        let mut rolls = RollStream::new(&rng, 5, 0, 0);
        let result = LootResolver::resolve([&LootTable::default()], 200, &mut rolls);
        assert!(result.is_empty());
    }
}

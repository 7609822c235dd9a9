//! Static per-tier loot tables.

use super::{AmountRange, CurrencyRule, ItemRule, LootEntry, LootTable};

/// Enemy archetype tier. Selects the default loot table.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ArchetypeTier {
    #[default]
    Basic,
    Elite,
    Boss,
}

struct TierChances {
    currency: u32,
    currency_amount: AmountRange,
    resource: u32,
    equipment: u32,
    consumable: u32,
}

impl ArchetypeTier {
    const fn chances(self) -> TierChances {
        match self {
            ArchetypeTier::Basic => TierChances {
                currency: 60,
                currency_amount: AmountRange::new(5, 15),
                resource: 40,
                equipment: 5,
                consumable: 20,
            },
            ArchetypeTier::Elite => TierChances {
                currency: 80,
                currency_amount: AmountRange::new(20, 50),
                resource: 60,
                equipment: 15,
                consumable: 35,
            },
            ArchetypeTier::Boss => TierChances {
                currency: 100,
                currency_amount: AmountRange::new(100, 250),
                resource: 100,
                equipment: 50,
                consumable: 60,
            },
        }
    }
}

impl LootTable {
    /// Default table for a tier, used when an archetype defines none.
    pub fn for_tier(tier: ArchetypeTier) -> Self {
        let chances = tier.chances();
        Self {
            currency: Some(CurrencyRule {
                chance_percent: chances.currency,
                amount: chances.currency_amount,
            }),
            resource: Some(ItemRule {
                chance_percent: chances.resource,
                entries: vec![
                    LootEntry::new("bone_fragment", 60).with_quantity(1, 3),
                    LootEntry::new("leather_scrap", 40).with_quantity(1, 2),
                ],
            }),
            equipment: Some(ItemRule {
                chance_percent: chances.equipment,
                entries: vec![
                    LootEntry::new("rusty_blade", 70),
                    LootEntry::new("worn_amulet", 30),
                ],
            }),
            consumable: Some(ItemRule {
                chance_percent: chances.consumable,
                entries: vec![
                    LootEntry::new("minor_potion", 80),
                    LootEntry::new("elixir", 20),
                ],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::LootCategory;

    #[test]
    fn higher_tiers_drop_more_often() {
        let basic = LootTable::for_tier(ArchetypeTier::Basic);
        let elite = LootTable::for_tier(ArchetypeTier::Elite);
        let boss = LootTable::for_tier(ArchetypeTier::Boss);
        for category in [
            LootCategory::Currency,
            LootCategory::Resource,
            LootCategory::Equipment,
            LootCategory::Consumable,
        ] {
            assert!(basic.base_chance(category) < elite.base_chance(category));
            assert!(elite.base_chance(category) <= boss.base_chance(category));
        }
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("BOSS".parse::<ArchetypeTier>().unwrap(), ArchetypeTier::Boss);
    }
}

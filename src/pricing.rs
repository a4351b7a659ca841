use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const UNKNOWN_TIER_LABEL: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    pub tier: u32,
    pub price: u64,
    pub label: String,
}

/// Таблица цен по тирам. Неизвестный тир стоит 0 и называется "Unknown".
#[derive(Debug, Clone)]
pub struct PricingTable {
    tiers: BTreeMap<u32, PriceTier>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::new(vec![
            PriceTier { tier: 1, price: 75, label: "Premium".to_string() },
            PriceTier { tier: 2, price: 50, label: "Standard".to_string() },
            PriceTier { tier: 3, price: 25, label: "Economy".to_string() },
        ])
    }
}

impl PricingTable {
    pub fn new(tiers: Vec<PriceTier>) -> Self {
        Self {
            tiers: tiers.into_iter().map(|t| (t.tier, t)).collect(),
        }
    }

    pub fn price_for(&self, tier: u32) -> u64 {
        self.tiers.get(&tier).map(|t| t.price).unwrap_or(0)
    }

    pub fn label_for(&self, tier: u32) -> &str {
        self.tiers
            .get(&tier)
            .map(|t| t.label.as_str())
            .unwrap_or(UNKNOWN_TIER_LABEL)
    }

    pub fn tiers(&self) -> impl Iterator<Item = &PriceTier> {
        self.tiers.values()
    }
}

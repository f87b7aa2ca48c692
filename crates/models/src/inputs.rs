use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;
use crate::pricing::{PackageDuration, SubscriptionTier};

/// One (tier, duration) combination. Rendered as `VIP_1_month`,
/// `Normal_3_months`, ... in input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionKey {
    pub tier: SubscriptionTier,
    pub duration: PackageDuration,
}

impl SubscriptionKey {
    pub const fn new(tier: SubscriptionTier, duration: PackageDuration) -> Self {
        Self { tier, duration }
    }

    /// Every combination, tiers in catalogue order, one month before three.
    pub fn all() -> Vec<SubscriptionKey> {
        SubscriptionTier::ALL
            .into_iter()
            .flat_map(|tier| {
                PackageDuration::ALL
                    .into_iter()
                    .map(move |duration| SubscriptionKey::new(tier, duration))
            })
            .collect()
    }

    /// Human readable name, e.g. `VIP - 3 Months`.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.tier, self.duration.label())
    }
}

impl fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.duration {
            PackageDuration::OneMonth => "1_month",
            PackageDuration::ThreeMonths => "3_months",
        };
        write!(f, "{}_{}", self.tier, suffix)
    }
}

impl FromStr for SubscriptionKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ModelError::UnknownSubscriptionKey(s.to_string());
        let (tier, rest) = s.split_once('_').ok_or_else(unknown)?;
        let tier = SubscriptionTier::from_str(tier).ok_or_else(unknown)?;
        let duration = match rest {
            "1_month" => PackageDuration::OneMonth,
            "3_months" => PackageDuration::ThreeMonths,
            _ => return Err(unknown()),
        };
        Ok(SubscriptionKey::new(tier, duration))
    }
}

impl Serialize for SubscriptionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SubscriptionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubscriptionCount {
    #[serde(default)]
    pub customers: u32,
    #[serde(default)]
    pub renewals: u32,
}

impl SubscriptionCount {
    pub const fn new(customers: u32, renewals: u32) -> Self {
        Self {
            customers,
            renewals,
        }
    }
}

/// Quantities of the services sold outside subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceQuantities {
    pub additional_bracelets: u32,
    pub challenge_participants: u32,
    pub adventure_participants: u32,
    pub competition_participants: u32,
    pub cbyi_non_subscribers: u32,
    pub bracelets_non_subscribers: u32,
    pub car_rental_customers: u32,
    pub challenge_fee: f64,
    pub adventure_fee: f64,
    pub competition_fee: f64,
}

impl Default for ServiceQuantities {
    fn default() -> Self {
        Self {
            additional_bracelets: 2,
            challenge_participants: 5,
            adventure_participants: 5,
            competition_participants: 5,
            cbyi_non_subscribers: 2,
            bracelets_non_subscribers: 2,
            car_rental_customers: 0,
            challenge_fee: 25.0,
            adventure_fee: 40.0,
            competition_fee: 35.0,
        }
    }
}

/// Customer and renewal counts per subscription plus service quantities for
/// the current (three-month) period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub subscriptions: BTreeMap<SubscriptionKey, SubscriptionCount>,
    #[serde(default)]
    pub services: ServiceQuantities,
}

impl CustomerInput {
    /// Input with no subscribers and default service quantities.
    pub fn empty() -> Self {
        Self {
            subscriptions: BTreeMap::new(),
            services: ServiceQuantities::default(),
        }
    }

    /// Counts for one combination; missing combinations count as zero.
    pub fn count(&self, key: SubscriptionKey) -> SubscriptionCount {
        self.subscriptions.get(&key).copied().unwrap_or_default()
    }

    pub fn set_count(&mut self, key: SubscriptionKey, count: SubscriptionCount) {
        self.subscriptions.insert(key, count);
    }

    /// Merges the given counts into this input, leaving other combinations as
    /// they are.
    pub fn update_counts<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (SubscriptionKey, SubscriptionCount)>,
    {
        for (key, count) in updates {
            self.set_count(key, count);
        }
    }

    pub fn total_customers(&self) -> u64 {
        self.subscriptions
            .values()
            .map(|c| c.customers as u64)
            .sum()
    }

    /// Copy with every customer and renewal count multiplied and truncated
    /// toward zero. Service quantities are left alone.
    pub fn with_multipliers(&self, customer_multiplier: f64, renewal_multiplier: f64) -> Self {
        let subscriptions = self
            .subscriptions
            .iter()
            .map(|(key, count)| {
                let customers = (count.customers as f64 * customer_multiplier).max(0.0) as u32;
                let renewals = (count.renewals as f64 * renewal_multiplier).max(0.0) as u32;
                (*key, SubscriptionCount::new(customers, renewals))
            })
            .collect();
        Self {
            subscriptions,
            services: self.services.clone(),
        }
    }
}

impl Default for CustomerInput {
    fn default() -> Self {
        use PackageDuration::*;
        use SubscriptionTier::*;

        let subscriptions = [
            (SubscriptionKey::new(Vip, OneMonth), SubscriptionCount::new(30, 10)),
            (SubscriptionKey::new(Vip, ThreeMonths), SubscriptionCount::new(20, 5)),
            (SubscriptionKey::new(Normal, OneMonth), SubscriptionCount::new(60, 40)),
            (SubscriptionKey::new(Normal, ThreeMonths), SubscriptionCount::new(90, 80)),
            (SubscriptionKey::new(Custom, OneMonth), SubscriptionCount::new(30, 25)),
            (SubscriptionKey::new(Custom, ThreeMonths), SubscriptionCount::new(50, 40)),
        ]
        .into_iter()
        .collect();

        Self {
            subscriptions,
            services: ServiceQuantities::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_key_format() {
        let key = SubscriptionKey::new(SubscriptionTier::Vip, PackageDuration::OneMonth);
        assert_eq!(key.to_string(), "VIP_1_month");
        assert_eq!(key.display_name(), "VIP - 1 Month");

        let key = SubscriptionKey::new(SubscriptionTier::Normal, PackageDuration::ThreeMonths);
        assert_eq!(key.to_string(), "Normal_3_months");
        assert_eq!(key.display_name(), "Normal - 3 Months");
    }

    #[test]
    fn test_subscription_key_parse() {
        let key: SubscriptionKey = "Custom_3_months".parse().unwrap();
        assert_eq!(key.tier, SubscriptionTier::Custom);
        assert_eq!(key.duration, PackageDuration::ThreeMonths);

        assert!("Gold_1_month".parse::<SubscriptionKey>().is_err());
        assert!("VIP_2_months".parse::<SubscriptionKey>().is_err());
        assert!("VIP".parse::<SubscriptionKey>().is_err());
    }

    #[test]
    fn test_all_keys_in_catalogue_order() {
        let names: Vec<String> = SubscriptionKey::all().iter().map(|k| k.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "VIP_1_month",
                "VIP_3_months",
                "Normal_1_month",
                "Normal_3_months",
                "Custom_1_month",
                "Custom_3_months",
            ]
        );
    }

    #[test]
    fn test_missing_combination_counts_as_zero() {
        let input = CustomerInput::empty();
        let key = SubscriptionKey::new(SubscriptionTier::Vip, PackageDuration::OneMonth);
        assert_eq!(input.count(key), SubscriptionCount::default());
        assert_eq!(input.total_customers(), 0);
    }

    #[test]
    fn test_default_input_totals() {
        let input = CustomerInput::default();
        assert_eq!(input.total_customers(), 280);
        assert_eq!(input.services.challenge_fee, 25.0);
    }

    #[test]
    fn test_with_multipliers_truncates() {
        let input = CustomerInput::default().with_multipliers(1.25, 0.5);
        let key = SubscriptionKey::new(SubscriptionTier::Vip, PackageDuration::ThreeMonths);
        // 20 * 1.25 = 25, 5 * 0.5 = 2.5 -> 2
        assert_eq!(input.count(key), SubscriptionCount::new(25, 2));
        assert_eq!(input.services, ServiceQuantities::default());
    }

    #[test]
    fn test_input_json_shape() {
        let raw = r#"{
            "subscriptions": {
                "VIP_1_month": {"customers": 3, "renewals": 1},
                "Normal_3_months": {"customers": 7}
            },
            "services": {"additional_bracelets": 9}
        }"#;
        let input: CustomerInput = serde_json::from_str(raw).unwrap();
        let key = SubscriptionKey::new(SubscriptionTier::Normal, PackageDuration::ThreeMonths);
        assert_eq!(input.count(key), SubscriptionCount::new(7, 0));
        assert_eq!(input.services.additional_bracelets, 9);
        // Unspecified quantities fall back to defaults.
        assert_eq!(input.services.adventure_fee, 40.0);
    }
}

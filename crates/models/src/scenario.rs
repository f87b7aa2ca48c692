use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::inputs::CustomerInput;
use crate::pricing::{
    CustomTierPricing, PricingCatalog, StandardTierPricing, SubscriptionTier, TierPricing,
};

/// Replacement price lists for some tiers. Tiers left as `None` keep the
/// session's prices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingOverrides {
    #[serde(rename = "VIP", default, skip_serializing_if = "Option::is_none")]
    pub vip: Option<StandardTierPricing>,
    #[serde(rename = "Normal", default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<StandardTierPricing>,
    #[serde(rename = "Custom", default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomTierPricing>,
}

impl PricingOverrides {
    pub fn is_empty(&self) -> bool {
        self.vip.is_none() && self.normal.is_none() && self.custom.is_none()
    }

    /// A new catalog with the overridden tiers swapped in.
    pub fn apply(&self, base: &PricingCatalog) -> PricingCatalog {
        PricingCatalog {
            vip: self.vip.clone().unwrap_or_else(|| base.vip.clone()),
            normal: self.normal.clone().unwrap_or_else(|| base.normal.clone()),
            custom: self.custom.clone().unwrap_or_else(|| base.custom.clone()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let tiers = [
            (SubscriptionTier::Vip, self.vip.as_ref().map(TierPricing::Standard)),
            (SubscriptionTier::Normal, self.normal.as_ref().map(TierPricing::Standard)),
            (SubscriptionTier::Custom, self.custom.as_ref().map(TierPricing::Custom)),
        ];
        for (tier, pricing) in tiers {
            if let Some(pricing) = pricing {
                pricing.validate().map_err(|e| ModelError::InvalidTierPricing {
                    tier,
                    reason: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Named growth and retention assumptions, optionally with a different price
/// list or different quantities for the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Annual growth rate, e.g. 0.15 for 15%.
    pub growth_rate: f64,
    /// Share of customers kept each month, within [0, 1].
    pub retention_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_overrides: Option<PricingOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_overrides: Option<CustomerInput>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, growth_rate: f64, retention_rate: f64) -> Result<Self> {
        let scenario = Self {
            name: name.into(),
            growth_rate,
            retention_rate,
            pricing_overrides: None,
            quantity_overrides: None,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    /// Unnamed assumptions used by sweeps; skips validation of the name.
    pub fn assumptions(growth_rate: f64, retention_rate: f64) -> Self {
        Self {
            name: String::new(),
            growth_rate,
            retention_rate,
            pricing_overrides: None,
            quantity_overrides: None,
        }
    }

    pub fn with_pricing_overrides(mut self, overrides: PricingOverrides) -> Self {
        self.pricing_overrides = Some(overrides);
        self
    }

    pub fn with_quantity_overrides(mut self, quantities: CustomerInput) -> Self {
        self.quantity_overrides = Some(quantities);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyScenarioName);
        }
        if !self.growth_rate.is_finite() || self.growth_rate < 0.0 {
            return Err(ModelError::InvalidGrowthRate(self.growth_rate));
        }
        if !(0.0..=1.0).contains(&self.retention_rate) {
            return Err(ModelError::InvalidRetentionRate(self.retention_rate));
        }
        if let Some(overrides) = &self.pricing_overrides {
            overrides.validate()?;
        }
        Ok(())
    }

    pub fn has_overrides(&self) -> bool {
        self.pricing_overrides.as_ref().is_some_and(|p| !p.is_empty())
            || self.quantity_overrides.is_some()
    }

    pub fn risk_level(&self) -> RiskLevel {
        if self.growth_rate > 0.30 || self.retention_rate < 0.85 {
            RiskLevel::High
        } else if self.growth_rate > 0.15 || self.retention_rate < 0.90 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Scenarios available to the forecaster, kept in insertion order. Owned by
/// the caller and passed into forecasting calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Scenario>", into = "Vec<Scenario>")]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    pub fn empty() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Adds a scenario, replacing any existing one with the same name in place.
    pub fn insert(&mut self, scenario: Scenario) -> Result<()> {
        scenario.validate()?;
        match self.scenarios.iter_mut().find(|s| s.name == scenario.name) {
            Some(existing) => *existing = scenario,
            None => self.scenarios.push(scenario),
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Scenario> {
        let idx = self.scenarios.iter().position(|s| s.name == name)?;
        Some(self.scenarios.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.scenarios.iter().map(|s| s.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        let scenarios = [
            ("Conservative", 0.05, 0.85),
            ("Moderate", 0.15, 0.90),
            ("Aggressive", 0.30, 0.95),
            ("Optimistic", 0.50, 0.98),
        ]
        .into_iter()
        .map(|(name, growth_rate, retention_rate)| Scenario {
            name: name.to_string(),
            growth_rate,
            retention_rate,
            pricing_overrides: None,
            quantity_overrides: None,
        })
        .collect();
        Self { scenarios }
    }
}

impl TryFrom<Vec<Scenario>> for ScenarioCatalog {
    type Error = ModelError;

    fn try_from(list: Vec<Scenario>) -> Result<Self> {
        let mut catalog = Self::empty();
        for scenario in list {
            catalog.insert(scenario)?;
        }
        Ok(catalog)
    }
}

impl From<ScenarioCatalog> for Vec<Scenario> {
    fn from(catalog: ScenarioCatalog) -> Self {
        catalog.scenarios
    }
}

use models::{CustomTierPricing, PricingCatalog, StandardTierPricing, SubscriptionTier};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Reasons a pricing document is rejected.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("pricing document must be a JSON object")]
    NotAnObject,

    #[error("pricing document has no \"{0}\" tier")]
    MissingTier(SubscriptionTier),

    #[error("invalid \"{tier}\" tier: {reason}")]
    InvalidTier {
        tier: SubscriptionTier,
        reason: String,
    },
}

/// Parses a full pricing catalog. Every tier key (`VIP`, `Normal`,
/// `Custom`) must be present and every price must be a finite value >= 0.
/// Unknown top-level keys are ignored.
pub fn parse_pricing(json: &str) -> Result<PricingCatalog, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(map) = value else {
        return Err(ImportError::NotAnObject);
    };

    for tier in SubscriptionTier::ALL {
        if !map.contains_key(tier.as_str()) {
            return Err(ImportError::MissingTier(tier));
        }
    }

    let catalog = PricingCatalog {
        vip: tier_body::<StandardTierPricing>(&map, SubscriptionTier::Vip)?,
        normal: tier_body::<StandardTierPricing>(&map, SubscriptionTier::Normal)?,
        custom: tier_body::<CustomTierPricing>(&map, SubscriptionTier::Custom)?,
    };
    validate_prices(&catalog)?;
    Ok(catalog)
}

fn tier_body<T: DeserializeOwned>(map: &Map<String, Value>, tier: SubscriptionTier) -> Result<T, ImportError> {
    let body = map.get(tier.as_str()).cloned().unwrap_or(Value::Null);
    serde_json::from_value(body).map_err(|e| ImportError::InvalidTier {
        tier,
        reason: e.to_string(),
    })
}

fn validate_prices(catalog: &PricingCatalog) -> Result<(), ImportError> {
    for tier in SubscriptionTier::ALL {
        catalog.tier(tier).validate().map_err(|e| ImportError::InvalidTier {
            tier,
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

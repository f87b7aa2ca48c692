use thiserror::Error;

use crate::pricing::{PriceComponent, SubscriptionTier};

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("scenario name must not be empty")]
    EmptyScenarioName,

    #[error("growth rate must be a finite value >= 0, got {0}")]
    InvalidGrowthRate(f64),

    #[error("retention rate must be within [0, 1], got {0}")]
    InvalidRetentionRate(f64),

    #[error("price component {component} is not part of the {tier} price list")]
    ComponentNotOnTier {
        tier: SubscriptionTier,
        component: PriceComponent,
    },

    #[error("the {0} tier has no digital profit")]
    NoDigitalProfit(SubscriptionTier),

    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("invalid {tier} price list: {reason}")]
    InvalidTierPricing {
        tier: SubscriptionTier,
        reason: String,
    },

    #[error("unknown subscription key: {0}")]
    UnknownSubscriptionKey(String),
}

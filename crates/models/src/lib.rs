//! # Models
//!
//! Plain data shared by the revenue planner crates: price lists, customer
//! inputs, scenarios, and the result types produced by the calculator and
//! the forecaster.

pub mod error;
pub mod forecast;
pub mod inputs;
pub mod insights;
pub mod pricing;
pub mod results;
pub mod scenario;

pub use crate::error::ModelError;
pub use crate::forecast::*;
pub use crate::insights::*;
pub use crate::inputs::{CustomerInput, ServiceQuantities, SubscriptionCount, SubscriptionKey};
pub use crate::pricing::*;
pub use crate::results::*;
pub use crate::scenario::{PricingOverrides, RiskLevel, Scenario, ScenarioCatalog};

use serde::{Deserialize, Serialize};

use crate::forecast::BreakEvenCustomers;

/// Headline ratios derived from the period totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessKpis {
    /// Revenue per unit of cost; 0 when there is no cost.
    pub revenue_cost_ratio: f64,
    /// Customers needed to cover the period's total cost at the current
    /// profit per customer.
    pub break_even_customers: BreakEvenCustomers,
    /// Share of the addressable market, in percent.
    pub market_penetration: f64,
    pub customer_acquisition_cost: f64,
    pub customer_lifetime_value: f64,
    /// 0 when the acquisition cost is 0.
    pub ltv_cac_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightLevel {
    Success,
    Info,
    Warning,
}

impl InsightLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightLevel::Success => "success",
            InsightLevel::Info => "info",
            InsightLevel::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightTopic {
    ProfitMargin,
    ProfitConcentration,
    CustomerValue,
    AdditionalServices,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub topic: InsightTopic,
    pub level: InsightLevel,
    /// The figure the insight was judged on (a percent or an amount).
    pub value: f64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationKind {
    PricingOptimization,
    Diversification,
    ServicesExpansion,
    CustomerAcquisition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub priority: Priority,
    pub impact: Priority,
    pub description: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub kpis: BusinessKpis,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
}

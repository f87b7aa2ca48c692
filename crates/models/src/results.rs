use serde::{Deserialize, Serialize};

use crate::inputs::SubscriptionKey;

/// Per-customer price of one package.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PackageCost {
    pub cost: f64,
    pub revenue: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionResult {
    pub key: SubscriptionKey,
    pub name: String,
    pub customers: u32,
    pub renewals: u32,
    pub cost_per_customer: f64,
    pub revenue_per_customer: f64,
    pub renewal_revenue: f64,
    pub total_cost: f64,
    /// Package revenue for all customers plus renewal revenue.
    pub total_revenue: f64,
    pub total_profit: f64,
    pub profit_margin: f64,
}

/// Services sold independently of subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AncillaryService {
    EventsAndChallenges,
    AdditionalBracelets,
    CbyiServices,
    NonSubscriberBracelets,
    CarRental,
}

impl AncillaryService {
    pub const ALL: [AncillaryService; 5] = [
        Self::EventsAndChallenges,
        Self::AdditionalBracelets,
        Self::CbyiServices,
        Self::NonSubscriberBracelets,
        Self::CarRental,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::EventsAndChallenges => "Events & Challenges",
            Self::AdditionalBracelets => "Additional Bracelets",
            Self::CbyiServices => "CBYI Services",
            Self::NonSubscriberBracelets => "Non-Subscriber Bracelets",
            Self::CarRental => "Car Rental",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResult {
    pub service: AncillaryService,
    pub name: String,
    pub cost: f64,
    pub revenue: f64,
    pub profit: f64,
}

/// Aggregates for the current (three-month) period. Always derived from a
/// pricing catalog and customer input, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub profit_margin: f64,
    pub total_customers: u64,
    pub revenue_per_customer: f64,
    pub cost_per_customer: f64,
    pub profit_per_customer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub profit_margin: f64,
    pub total_customers: u64,
    pub subscription_types_count: usize,
    pub additional_services_count: usize,
    /// `None` when no subscription has customers.
    pub best_subscription: Option<String>,
    pub best_subscription_profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakdownCategory {
    Subscription,
    AdditionalService,
}

impl BreakdownCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakdownCategory::Subscription => "Subscription",
            BreakdownCategory::AdditionalService => "Additional Service",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub category: BreakdownCategory,
    pub name: String,
    pub cost: f64,
    pub revenue: f64,
    pub profit: f64,
    pub margin: f64,
    pub customers: u32,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveResults {
    /// Combinations with at least one customer, in catalogue order.
    pub subscriptions: Vec<SubscriptionResult>,
    pub additional_services: Vec<ServiceResult>,
    pub totals: PeriodTotals,
    pub summary: ResultsSummary,
    pub breakdown: Vec<BreakdownLine>,
}

impl ComprehensiveResults {
    pub fn subscription(&self, key: SubscriptionKey) -> Option<&SubscriptionResult> {
        self.subscriptions.iter().find(|s| s.key == key)
    }

    pub fn service(&self, service: AncillaryService) -> Option<&ServiceResult> {
        self.additional_services.iter().find(|s| s.service == service)
    }
}

/// Row of the package overview, one per combination including empty ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSummaryRow {
    pub key: SubscriptionKey,
    pub customers: u32,
    pub renewals: u32,
    pub cost_per_customer: f64,
    pub revenue_per_customer: f64,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub profit_margin: f64,
    pub renewal_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRank {
    pub rank: usize,
    pub subscription: String,
    pub total_profit: f64,
    pub profit_margin: f64,
    pub customers: u32,
    pub revenue_per_customer: f64,
    /// `total_profit * profit_margin / 100`
    pub score: f64,
}

/// Growth-only projection row, see `growth_impact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthImpactRow {
    pub month: u32,
    pub growth_factor: f64,
    pub monthly_revenue: f64,
    pub monthly_cost: f64,
    pub monthly_profit: f64,
    pub cumulative_revenue: f64,
    pub cumulative_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthImpact {
    pub base_monthly_revenue: f64,
    pub base_monthly_profit: f64,
    pub growth_rate: f64,
    pub periods: u32,
    pub projections: Vec<GrowthImpactRow>,
    pub total_projected_revenue: f64,
    pub total_projected_profit: f64,
}

/// Customer/renewal multipliers applied to the current input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeAdjustment {
    pub customer_multiplier: f64,
    pub renewal_multiplier: f64,
}

impl Default for VolumeAdjustment {
    fn default() -> Self {
        Self {
            customer_multiplier: 1.0,
            renewal_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeScenarioResult {
    pub name: String,
    pub adjustment: VolumeAdjustment,
    pub totals: PeriodTotals,
}

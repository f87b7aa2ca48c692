use serde::{Deserialize, Serialize};

use crate::results::ComprehensiveResults;
use crate::scenario::{RiskLevel, Scenario};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjection {
    pub month: u32,
    pub customers: f64,
    pub new_customers: f64,
    pub monthly_revenue: f64,
    pub monthly_cost: f64,
    pub monthly_profit: f64,
    pub cumulative_revenue: f64,
    pub cumulative_cost: f64,
    pub cumulative_profit: f64,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub final_customers: f64,
    /// Percentage change of the customer count over the horizon.
    pub customer_growth: f64,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub period_months: u32,
    pub scenario: Scenario,
    pub monthly_breakdown: Vec<MonthlyProjection>,
    pub period_totals: PeriodSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioForecast {
    pub scenario: String,
    /// One result per requested horizon, in request order.
    pub periods: Vec<ForecastResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub base_results: ComprehensiveResults,
    pub forecasts: Vec<ScenarioForecast>,
    pub scenarios_used: Vec<String>,
    pub periods_used: Vec<u32>,
}

impl ForecastReport {
    pub fn forecast(&self, scenario: &str, months: u32) -> Option<&ForecastResult> {
        self.forecasts
            .iter()
            .find(|f| f.scenario == scenario)
            .and_then(|f| f.periods.iter().find(|p| p.period_months == months))
    }
}

/// One line of the scenario comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario: String,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub profit_margin: f64,
    pub final_customers: f64,
    pub customer_growth: f64,
    pub growth_rate: f64,
    pub retention_rate: f64,
    pub risk_level: RiskLevel,
}

/// Flattened (scenario, horizon) row for tables and CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTableRow {
    pub scenario: String,
    pub period_months: u32,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub profit_margin: f64,
    pub final_customers: f64,
    pub customer_growth: f64,
    pub growth_rate: f64,
    pub retention_rate: f64,
    pub risk_level: RiskLevel,
}

/// Customers needed to cover the fixed costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum BreakEvenCustomers {
    Customers(f64),
    /// Average profit per customer is zero or negative.
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum BreakEvenTimeline {
    /// Months of growth needed; 0 when the current customer base suffices.
    Months(f64),
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    pub scenario: String,
    pub break_even_customers: BreakEvenCustomers,
    pub current_customers: u64,
    pub months_to_break_even: BreakEvenTimeline,
    /// Monthly growth rate in percent.
    pub monthly_growth_rate: f64,
    pub avg_profit_per_customer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub parameter_value: f64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub final_customers: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub period_months: u32,
    pub growth_rate_sensitivity: Vec<SensitivityPoint>,
    pub retention_rate_sensitivity: Vec<SensitivityPoint>,
}

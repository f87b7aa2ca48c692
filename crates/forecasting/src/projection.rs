use models::{ForecastResult, MonthlyProjection, PeriodSummary, PeriodTotals, Scenario};
use revenue_engine::percent_of;

use crate::seasonality::seasonality_factor;

/// Length of the period the aggregate totals describe. Monthly baseline
/// figures are the period totals divided by this.
pub const BASELINE_PERIOD_MONTHS: f64 = 3.0;

/// Longest horizon accepted from settings and the command line (50 years).
pub const MAX_HORIZON_MONTHS: u32 = 600;

/// Starting point of a projection: average monthly revenue and cost, plus the
/// customer count the growth factor is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionBaseline {
    pub monthly_revenue: f64,
    pub monthly_cost: f64,
    pub customers: f64,
}

impl ProjectionBaseline {
    pub fn from_totals(totals: &PeriodTotals) -> Self {
        Self {
            monthly_revenue: totals.total_revenue / BASELINE_PERIOD_MONTHS,
            monthly_cost: totals.total_cost / BASELINE_PERIOD_MONTHS,
            customers: totals.total_customers as f64,
        }
    }

    /// Monthly figures from `totals`, customer count from `customers_from`.
    pub fn with_customers_of(totals: &PeriodTotals, customers_from: &PeriodTotals) -> Self {
        Self {
            customers: customers_from.total_customers as f64,
            ..Self::from_totals(totals)
        }
    }
}

/// Customer-flow projection.
///
/// Each month the customer base keeps `retention_rate` of itself and gains
/// `growth_rate / 12` of itself as new customers (simple monthly share of the
/// annual rate, not compounded). Revenue and cost scale with the customer
/// base relative to the baseline, then get the calendar seasonality factor.
/// Cumulative figures are running sums of the recorded monthly values.
///
/// A baseline without customers cannot grow, so its monthly figures are
/// passed through unscaled.
pub fn project(baseline: &ProjectionBaseline, scenario: &Scenario, months: u32) -> ForecastResult {
    let mut monthly_breakdown = Vec::with_capacity(months.min(MAX_HORIZON_MONTHS) as usize);
    let mut cumulative_revenue = 0.0;
    let mut cumulative_cost = 0.0;
    let mut cumulative_profit = 0.0;
    let mut current_customers = baseline.customers;

    for month in 1..=months {
        let new_customers = current_customers * scenario.growth_rate / 12.0;
        let retained_customers = current_customers * scenario.retention_rate;
        current_customers = retained_customers + new_customers;

        let growth_factor = if baseline.customers > 0.0 {
            current_customers / baseline.customers
        } else {
            1.0
        };

        let seasonality = seasonality_factor(month);
        let monthly_revenue = baseline.monthly_revenue * growth_factor * seasonality;
        let monthly_cost = baseline.monthly_cost * growth_factor * seasonality;
        let monthly_profit = monthly_revenue - monthly_cost;

        cumulative_revenue += monthly_revenue;
        cumulative_cost += monthly_cost;
        cumulative_profit += monthly_profit;

        monthly_breakdown.push(MonthlyProjection {
            month,
            customers: current_customers,
            new_customers,
            monthly_revenue,
            monthly_cost,
            monthly_profit,
            cumulative_revenue,
            cumulative_cost,
            cumulative_profit,
            profit_margin: percent_of(monthly_profit, monthly_revenue),
        });
    }

    let customer_growth = if baseline.customers > 0.0 {
        (current_customers - baseline.customers) / baseline.customers * 100.0
    } else {
        0.0
    };

    ForecastResult {
        period_months: months,
        scenario: scenario.clone(),
        monthly_breakdown,
        period_totals: PeriodSummary {
            total_revenue: cumulative_revenue,
            total_cost: cumulative_cost,
            total_profit: cumulative_profit,
            final_customers: current_customers,
            customer_growth,
            profit_margin: percent_of(cumulative_profit, cumulative_revenue),
        },
    }
}

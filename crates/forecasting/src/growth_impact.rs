use models::{GrowthImpact, GrowthImpactRow, PeriodTotals};

use crate::projection::{BASELINE_PERIOD_MONTHS, MAX_HORIZON_MONTHS};

/// Compounding-only projection: monthly revenue and cost from the baseline
/// grow by `(1 + growth_rate)^month`. No customer flow, no seasonality.
/// Not the same model as [`crate::projection::project`]; the two give
/// different numbers for the same rate.
pub fn growth_impact(totals: &PeriodTotals, growth_rate: f64, periods: u32) -> GrowthImpact {
    let monthly_revenue = totals.total_revenue / BASELINE_PERIOD_MONTHS;
    let monthly_cost = totals.total_cost / BASELINE_PERIOD_MONTHS;

    let mut projections = Vec::with_capacity(periods.min(MAX_HORIZON_MONTHS) as usize);
    let mut cumulative_revenue = 0.0;
    let mut cumulative_profit = 0.0;

    for month in 1..=periods {
        let growth_factor = (1.0 + growth_rate).powf(f64::from(month));
        let revenue = monthly_revenue * growth_factor;
        let cost = monthly_cost * growth_factor;
        let profit = revenue - cost;

        cumulative_revenue += revenue;
        cumulative_profit += profit;

        projections.push(GrowthImpactRow {
            month,
            growth_factor,
            monthly_revenue: revenue,
            monthly_cost: cost,
            monthly_profit: profit,
            cumulative_revenue,
            cumulative_profit,
        });
    }

    GrowthImpact {
        base_monthly_revenue: monthly_revenue,
        base_monthly_profit: monthly_revenue - monthly_cost,
        growth_rate,
        periods,
        projections,
        total_projected_revenue: cumulative_revenue,
        total_projected_profit: cumulative_profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals() -> PeriodTotals {
        PeriodTotals {
            total_revenue: 300_000.0,
            total_cost: 210_000.0,
            total_customers: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_compounds_from_first_month() {
        let impact = growth_impact(&totals(), 0.1, 3);
        assert_eq!(impact.base_monthly_revenue, 100_000.0);
        assert_eq!(impact.base_monthly_profit, 30_000.0);

        let m1 = &impact.projections[0];
        assert!((m1.growth_factor - 1.1).abs() < 1e-12);
        assert!((m1.monthly_revenue - 110_000.0).abs() < 1e-6);

        let m3 = &impact.projections[2];
        assert!((m3.growth_factor - 1.331).abs() < 1e-12);
        assert!((m3.monthly_profit - 30_000.0 * 1.331).abs() < 1e-6);
        assert!((impact.total_projected_revenue - 100_000.0 * (1.1 + 1.21 + 1.331)).abs() < 1e-6);
    }

    #[test]
    fn test_no_seasonality_and_zero_growth_is_flat() {
        let impact = growth_impact(&totals(), 0.0, 12);
        assert!(impact.projections.iter().all(|p| p.monthly_revenue == 100_000.0));
        assert_eq!(impact.total_projected_revenue, 1_200_000.0);
    }

    #[test]
    fn test_horizon_past_the_limit_still_runs_every_month() {
        let periods = MAX_HORIZON_MONTHS + 12;
        let impact = growth_impact(&totals(), 0.001, periods);
        assert_eq!(impact.projections.len(), periods as usize);
        let last = impact.projections.last().unwrap();
        assert!((last.growth_factor - 1.001f64.powf(f64::from(periods))).abs() < 1e-9);
        assert!(last.growth_factor.is_finite());
    }

    #[test]
    fn test_zero_baseline() {
        let impact = growth_impact(&PeriodTotals::default(), 0.2, 4);
        assert_eq!(impact.total_projected_profit, 0.0);
        assert_eq!(impact.projections.len(), 4);
    }
}

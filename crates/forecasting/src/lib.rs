//! # Forecasting
//!
//! Projects the current-period totals forward under named scenarios.
//!
//! - [`projection`]: customer-flow projection with seasonality
//! - [`break_even`]: customers and months needed to cover fixed costs
//! - [`sensitivity`]: growth and retention sweeps
//! - [`growth_impact`]: compounding-only projection used by the growth report
//!
//! [`Forecaster`] ties these to a pricing catalog, customer input and
//! scenario catalog owned by the caller. Every call recomputes from those
//! inputs; nothing is cached between calls.

pub mod break_even;
pub mod growth_impact;
pub mod projection;
pub mod seasonality;
pub mod sensitivity;

use models::*;
use revenue_engine::compute_comprehensive_results;
use tracing::{debug, warn};

pub use crate::projection::MAX_HORIZON_MONTHS;

use crate::projection::ProjectionBaseline;
use crate::sensitivity::SensitivityConfig;

/// Horizons offered when the caller does not pick any.
pub const DEFAULT_FORECAST_PERIODS: [u32; 4] = [3, 6, 9, 12];

pub struct Forecaster<'a> {
    catalog: &'a PricingCatalog,
    inputs: &'a CustomerInput,
    scenarios: &'a ScenarioCatalog,
}

impl<'a> Forecaster<'a> {
    pub fn new(
        catalog: &'a PricingCatalog,
        inputs: &'a CustomerInput,
        scenarios: &'a ScenarioCatalog,
    ) -> Self {
        Self {
            catalog,
            inputs,
            scenarios,
        }
    }

    pub fn base_results(&self) -> ComprehensiveResults {
        compute_comprehensive_results(self.catalog, self.inputs)
    }

    /// Baseline for a scenario. Pricing and quantity overrides replace the
    /// session's catalog and input when recomputing the monthly revenue and
    /// cost; the customer count stays that of `base`.
    fn baseline_for(&self, base: &PeriodTotals, scenario: &Scenario) -> ProjectionBaseline {
        if !scenario.has_overrides() {
            return ProjectionBaseline::from_totals(base);
        }

        let catalog = match &scenario.pricing_overrides {
            Some(overrides) => overrides.apply(self.catalog),
            None => self.catalog.clone(),
        };
        let inputs = scenario.quantity_overrides.as_ref().unwrap_or(self.inputs);
        let adjusted = compute_comprehensive_results(&catalog, inputs).totals;
        debug!(
            scenario = %scenario.name,
            revenue = adjusted.total_revenue,
            cost = adjusted.total_cost,
            "recomputed baseline with scenario overrides"
        );
        ProjectionBaseline::with_customers_of(&adjusted, base)
    }

    /// Projects `base` forward `months` months under `scenario`.
    pub fn project_period(&self, base: &PeriodTotals, scenario: &Scenario, months: u32) -> ForecastResult {
        let baseline = self.baseline_for(base, scenario);
        projection::project(&baseline, scenario, months)
    }

    /// Forecasts every requested (scenario, horizon) pair from one baseline.
    /// Names missing from the scenario catalog are skipped. Horizons keep
    /// their request order; a repeated horizon is forecast once.
    pub fn generate_forecast(&self, periods: &[u32], scenario_names: &[String]) -> ForecastReport {
        let base_results = self.base_results();
        let mut forecasts: Vec<ScenarioForecast> = Vec::new();

        for name in scenario_names {
            let Some(scenario) = self.scenarios.get(name) else {
                warn!(scenario = %name, "unknown scenario skipped");
                continue;
            };
            if forecasts.iter().any(|f| &f.scenario == name) {
                continue;
            }

            let mut results: Vec<ForecastResult> = Vec::with_capacity(periods.len());
            for &months in periods {
                if results.iter().any(|r| r.period_months == months) {
                    continue;
                }
                results.push(self.project_period(&base_results.totals, scenario, months));
            }
            forecasts.push(ScenarioForecast {
                scenario: name.clone(),
                periods: results,
            });
        }

        let scenarios_used = forecasts.iter().map(|f| f.scenario.clone()).collect();
        ForecastReport {
            base_results,
            forecasts,
            scenarios_used,
            periods_used: periods.to_vec(),
        }
    }

    /// Every catalog scenario at one horizon, side by side.
    pub fn compare_scenarios(&self, period_months: u32) -> Vec<ScenarioComparison> {
        let base = self.base_results().totals;
        self.scenarios
            .iter()
            .map(|scenario| {
                let totals = self.project_period(&base, scenario, period_months).period_totals;
                ScenarioComparison {
                    scenario: scenario.name.clone(),
                    total_revenue: totals.total_revenue,
                    total_profit: totals.total_profit,
                    profit_margin: totals.profit_margin,
                    final_customers: totals.final_customers,
                    customer_growth: totals.customer_growth,
                    growth_rate: scenario.growth_rate,
                    retention_rate: scenario.retention_rate,
                    risk_level: scenario.risk_level(),
                }
            })
            .collect()
    }

    pub fn break_even_analysis(&self, fixed_costs: f64) -> Vec<BreakEvenResult> {
        let base = self.base_results().totals;
        self.scenarios
            .iter()
            .map(|scenario| break_even::analyze(&base, scenario, fixed_costs))
            .collect()
    }

    pub fn sensitivity_analysis(&self, base_period: u32, config: &SensitivityConfig) -> SensitivityReport {
        let base = self.base_results().totals;
        sensitivity::sweep(&ProjectionBaseline::from_totals(&base), config, base_period)
    }

    pub fn growth_impact(&self, growth_rate: f64, periods: u32) -> GrowthImpact {
        growth_impact::growth_impact(&self.base_results().totals, growth_rate, periods)
    }
}

/// One row per (scenario, horizon), in report order.
pub fn forecast_table(report: &ForecastReport) -> Vec<ForecastTableRow> {
    report
        .forecasts
        .iter()
        .flat_map(|f| f.periods.iter())
        .map(|result| {
            let totals = &result.period_totals;
            ForecastTableRow {
                scenario: result.scenario.name.clone(),
                period_months: result.period_months,
                total_revenue: totals.total_revenue,
                total_cost: totals.total_cost,
                total_profit: totals.total_profit,
                profit_margin: totals.profit_margin,
                final_customers: totals.final_customers,
                customer_growth: totals.customer_growth,
                growth_rate: result.scenario.growth_rate,
                retention_rate: result.scenario.retention_rate,
                risk_level: result.scenario.risk_level(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        catalog: PricingCatalog,
        inputs: CustomerInput,
        scenarios: ScenarioCatalog,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: PricingCatalog::default(),
                inputs: CustomerInput::default(),
                scenarios: ScenarioCatalog::default(),
            }
        }

        fn forecaster(&self) -> Forecaster<'_> {
            Forecaster::new(&self.catalog, &self.inputs, &self.scenarios)
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_generate_forecast_skips_unknown_scenarios() {
        let fx = Fixture::new();
        let report = fx
            .forecaster()
            .generate_forecast(&[3, 12], &names(&["Moderate", "Moonshot", "Aggressive"]));

        assert_eq!(report.scenarios_used, names(&["Moderate", "Aggressive"]));
        assert_eq!(report.periods_used, vec![3, 12]);
        assert_eq!(report.forecasts.len(), 2);

        let moderate_12 = report.forecast("Moderate", 12).unwrap();
        assert_eq!(moderate_12.monthly_breakdown.len(), 12);
        assert!(report.forecast("Moonshot", 3).is_none());
    }

    #[test]
    fn test_forecasts_share_one_baseline() {
        let fx = Fixture::new();
        let forecaster = fx.forecaster();
        let report = forecaster.generate_forecast(&DEFAULT_FORECAST_PERIODS, &fx.scenarios.names());
        let direct = forecaster.project_period(
            &report.base_results.totals,
            fx.scenarios.get("Conservative").unwrap(),
            6,
        );
        assert_eq!(report.forecast("Conservative", 6), Some(&direct));
        assert_eq!(report.forecasts.len(), 4);
    }

    #[test]
    fn test_horizons_keep_request_order_without_repeats() {
        let fx = Fixture::new();
        let report = fx
            .forecaster()
            .generate_forecast(&[12, 3, 12, 6], &names(&["Moderate"]));
        let months: Vec<u32> = report.forecasts[0].periods.iter().map(|p| p.period_months).collect();
        assert_eq!(months, vec![12, 3, 6]);
        assert_eq!(report.forecast("Moderate", 6).unwrap().monthly_breakdown.len(), 6);
    }

    #[test]
    fn test_three_month_horizon_starts_from_a_third_of_the_period() {
        let fx = Fixture::new();
        let forecaster = fx.forecaster();
        let base = forecaster.base_results().totals;
        let flat = Scenario::new("Flat", 0.0, 1.0).unwrap();
        let result = forecaster.project_period(&base, &flat, 3);

        let expected = base.total_revenue / 3.0 * (0.90 + 0.95 + 1.10);
        assert!((result.period_totals.total_revenue - expected).abs() < 1e-6);
    }

    #[test]
    fn test_pricing_overrides_change_baseline_only_for_that_scenario() {
        let mut fx = Fixture::new();
        let mut vip = fx.catalog.vip.clone();
        vip.digital_profit += 1_000.0;
        let overridden = Scenario::new("Premium VIP", 0.15, 0.90)
            .unwrap()
            .with_pricing_overrides(PricingOverrides {
                vip: Some(vip),
                ..Default::default()
            });
        fx.scenarios.insert(overridden).unwrap();

        let forecaster = fx.forecaster();
        let base = forecaster.base_results().totals;
        let plain = forecaster.project_period(&base, fx.scenarios.get("Moderate").unwrap(), 1);
        let premium = forecaster.project_period(&base, fx.scenarios.get("Premium VIP").unwrap(), 1);

        // 50 VIP customers, 1000 more each over the quarter
        let extra_monthly = 50.0 * 1_000.0 / 3.0;
        let plain_m1 = &plain.monthly_breakdown[0];
        let premium_m1 = &premium.monthly_breakdown[0];
        let factor = plain_m1.customers / base.total_customers as f64 * 0.90;
        assert!((premium_m1.monthly_revenue - plain_m1.monthly_revenue - extra_monthly * factor).abs() < 1e-4);
        assert_eq!(premium_m1.customers, plain_m1.customers);

        // Session pricing is untouched.
        assert_eq!(fx.catalog, PricingCatalog::default());
    }

    #[test]
    fn test_quantity_overrides_recompute_baseline() {
        let mut fx = Fixture::new();
        let doubled = fx.inputs.with_multipliers(2.0, 2.0);
        let scenario = Scenario::new("Double", 0.0, 1.0)
            .unwrap()
            .with_quantity_overrides(doubled.clone());
        fx.scenarios.insert(scenario).unwrap();

        let forecaster = fx.forecaster();
        let base = forecaster.base_results().totals;
        let result = forecaster.project_period(&base, fx.scenarios.get("Double").unwrap(), 1);

        let doubled_totals = compute_comprehensive_results(&fx.catalog, &doubled).totals;
        let expected = doubled_totals.total_revenue / 3.0 * 0.90;
        assert!((result.monthly_breakdown[0].monthly_revenue - expected).abs() < 1e-6);
        // Customer flow is still measured against the session baseline.
        assert_eq!(result.monthly_breakdown[0].customers, base.total_customers as f64);
    }

    #[test]
    fn test_compare_scenarios_in_catalog_order() {
        let fx = Fixture::new();
        let comparison = fx.forecaster().compare_scenarios(12);
        let order: Vec<&str> = comparison.iter().map(|c| c.scenario.as_str()).collect();
        assert_eq!(order, vec!["Conservative", "Moderate", "Aggressive", "Optimistic"]);
        assert_eq!(comparison[3].risk_level, RiskLevel::High);
        assert!(comparison[3].final_customers > comparison[0].final_customers);
    }

    #[test]
    fn test_break_even_per_scenario() {
        let fx = Fixture::new();
        let results = fx.forecaster().break_even_analysis(0.0);
        assert_eq!(results.len(), 4);
        for r in &results {
            assert_eq!(r.break_even_customers, BreakEvenCustomers::Customers(0.0));
            assert_eq!(r.months_to_break_even, BreakEvenTimeline::Months(0.0));
        }
    }

    #[test]
    fn test_sensitivity_uses_session_baseline() {
        let fx = Fixture::new();
        let forecaster = fx.forecaster();
        let report = forecaster.sensitivity_analysis(12, &SensitivityConfig::default());
        let base = forecaster.base_results().totals;
        let direct = forecaster.project_period(&base, &Scenario::assumptions(0.15, 0.90), 12);
        assert_eq!(
            report.growth_rate_sensitivity[2].total_revenue,
            direct.period_totals.total_revenue
        );
    }

    #[test]
    fn test_forecast_table_rows() {
        let fx = Fixture::new();
        let report = fx
            .forecaster()
            .generate_forecast(&[6, 3], &names(&["Optimistic"]));
        let rows = forecast_table(&report);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].period_months, 6);
        assert_eq!(rows[1].period_months, 3);
        assert_eq!(rows[0].growth_rate, 0.50);
        assert_eq!(rows[0].risk_level, RiskLevel::High);
    }
}

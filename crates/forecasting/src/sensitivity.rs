use serde::{Deserialize, Serialize};

use models::{Scenario, SensitivityPoint, SensitivityReport};

use crate::projection::{ProjectionBaseline, project};

/// Values swept by the sensitivity analysis. Each sweep varies one rate and
/// holds the other at its base value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityConfig {
    pub growth_rates: Vec<f64>,
    pub base_retention: f64,
    pub retention_rates: Vec<f64>,
    pub base_growth: f64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            growth_rates: vec![0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.40, 0.50],
            base_retention: 0.90,
            retention_rates: vec![0.80, 0.85, 0.90, 0.95, 0.98],
            base_growth: 0.15,
        }
    }
}

fn point(baseline: &ProjectionBaseline, value: f64, scenario: &Scenario, months: u32) -> SensitivityPoint {
    let totals = project(baseline, scenario, months).period_totals;
    SensitivityPoint {
        parameter_value: value,
        total_revenue: totals.total_revenue,
        total_profit: totals.total_profit,
        final_customers: totals.final_customers,
    }
}

pub fn sweep(baseline: &ProjectionBaseline, config: &SensitivityConfig, months: u32) -> SensitivityReport {
    let growth_rate_sensitivity = config
        .growth_rates
        .iter()
        .map(|&g| point(baseline, g, &Scenario::assumptions(g, config.base_retention), months))
        .collect();

    let retention_rate_sensitivity = config
        .retention_rates
        .iter()
        .map(|&r| point(baseline, r, &Scenario::assumptions(config.base_growth, r), months))
        .collect();

    SensitivityReport {
        period_months: months,
        growth_rate_sensitivity,
        retention_rate_sensitivity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> ProjectionBaseline {
        ProjectionBaseline {
            monthly_revenue: 100_000.0,
            monthly_cost: 60_000.0,
            customers: 280.0,
        }
    }

    #[test]
    fn test_default_sweep_sizes_and_order() {
        let report = sweep(&baseline(), &SensitivityConfig::default(), 12);
        assert_eq!(report.period_months, 12);
        let growth: Vec<f64> = report
            .growth_rate_sensitivity
            .iter()
            .map(|p| p.parameter_value)
            .collect();
        assert_eq!(growth, vec![0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.40, 0.50]);
        assert_eq!(report.retention_rate_sensitivity.len(), 5);
        assert_eq!(report.retention_rate_sensitivity[4].parameter_value, 0.98);
    }

    #[test]
    fn test_more_growth_means_more_revenue() {
        let report = sweep(&baseline(), &SensitivityConfig::default(), 12);
        assert!(
            report
                .growth_rate_sensitivity
                .windows(2)
                .all(|w| w[1].total_revenue > w[0].total_revenue)
        );
        assert!(
            report
                .retention_rate_sensitivity
                .windows(2)
                .all(|w| w[1].final_customers > w[0].final_customers)
        );
    }

    #[test]
    fn test_points_match_direct_projection() {
        let config = SensitivityConfig::default();
        let report = sweep(&baseline(), &config, 6);
        let direct = project(&baseline(), &Scenario::assumptions(0.15, 0.95), 6);
        let p = &report.retention_rate_sensitivity[3];
        assert_eq!(p.total_profit, direct.period_totals.total_profit);
        assert_eq!(p.final_customers, direct.period_totals.final_customers);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SensitivityConfig =
            serde_json::from_str(r#"{"growth_rates": [0.1, 0.2]}"#).unwrap();
        assert_eq!(config.growth_rates, vec![0.1, 0.2]);
        assert_eq!(config.base_retention, 0.90);
        assert_eq!(config.retention_rates.len(), 5);
    }
}

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use models::{BreakdownCategory, ComprehensiveResults, ForecastResult, ForecastTableRow};
use revenue_engine::percent_of;
use serde::Serialize;

/// One line of the financial breakdown export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRecord {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Customers")]
    pub customers: u64,
    #[serde(rename = "Cost")]
    pub cost: f64,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "Profit")]
    pub profit: f64,
    #[serde(rename = "Margin_Percent")]
    pub margin_percent: f64,
    #[serde(rename = "Cost_Per_Customer")]
    pub cost_per_customer: f64,
    #[serde(rename = "Revenue_Per_Customer")]
    pub revenue_per_customer: f64,
}

/// Subscriptions, then services, then a `TOTAL` line from the period totals.
/// Services carry no customer count.
pub fn breakdown_records(results: &ComprehensiveResults) -> Vec<BreakdownRecord> {
    let subscriptions = results.subscriptions.iter().map(|s| BreakdownRecord {
        category: BreakdownCategory::Subscription.as_str().to_string(),
        name: s.name.clone(),
        customers: s.customers as u64,
        cost: s.total_cost,
        revenue: s.total_revenue,
        profit: s.total_profit,
        margin_percent: s.profit_margin,
        cost_per_customer: s.cost_per_customer,
        revenue_per_customer: s.revenue_per_customer,
    });

    let services = results.additional_services.iter().map(|s| BreakdownRecord {
        category: BreakdownCategory::AdditionalService.as_str().to_string(),
        name: s.name.clone(),
        customers: 0,
        cost: s.cost,
        revenue: s.revenue,
        profit: s.profit,
        margin_percent: percent_of(s.profit, s.revenue),
        cost_per_customer: 0.0,
        revenue_per_customer: 0.0,
    });

    let totals = &results.totals;
    let total = BreakdownRecord {
        category: "TOTAL".to_string(),
        name: "All Services".to_string(),
        customers: totals.total_customers,
        cost: totals.total_cost,
        revenue: totals.total_revenue,
        profit: totals.total_profit,
        margin_percent: totals.profit_margin,
        cost_per_customer: totals.cost_per_customer,
        revenue_per_customer: totals.revenue_per_customer,
    };

    subscriptions.chain(services).chain(std::iter::once(total)).collect()
}

#[derive(Debug, Serialize)]
struct ForecastRecord<'a> {
    #[serde(rename = "Scenario")]
    scenario: &'a str,
    #[serde(rename = "Period (Months)")]
    period_months: u32,
    #[serde(rename = "Total Revenue")]
    total_revenue: f64,
    #[serde(rename = "Total Cost")]
    total_cost: f64,
    #[serde(rename = "Total Profit")]
    total_profit: f64,
    #[serde(rename = "Profit Margin (%)")]
    profit_margin: f64,
    #[serde(rename = "Final Customers")]
    final_customers: f64,
    #[serde(rename = "Customer Growth (%)")]
    customer_growth: f64,
    #[serde(rename = "Growth Rate")]
    growth_rate: f64,
    #[serde(rename = "Retention Rate")]
    retention_rate: f64,
    #[serde(rename = "Risk Level")]
    risk_level: &'static str,
}

impl<'a> From<&'a ForecastTableRow> for ForecastRecord<'a> {
    fn from(row: &'a ForecastTableRow) -> Self {
        Self {
            scenario: &row.scenario,
            period_months: row.period_months,
            total_revenue: row.total_revenue,
            total_cost: row.total_cost,
            total_profit: row.total_profit,
            profit_margin: row.profit_margin,
            final_customers: row.final_customers,
            customer_growth: row.customer_growth,
            growth_rate: row.growth_rate,
            retention_rate: row.retention_rate,
            risk_level: row.risk_level.as_str(),
        }
    }
}

/// Writes serializable rows as CSV with a header line.
pub fn write_records<W: Write, T: Serialize>(writer: W, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row).context("serializing CSV row")?;
    }
    wtr.flush().context("flushing CSV output")?;
    Ok(())
}

pub fn write_breakdown<W: Write>(writer: W, results: &ComprehensiveResults) -> Result<()> {
    write_records(writer, breakdown_records(results))
}

pub fn write_forecast_table<W: Write>(writer: W, rows: &[ForecastTableRow]) -> Result<()> {
    write_records(writer, rows.iter().map(ForecastRecord::from))
}

/// Month by month rows of a single forecast.
pub fn write_monthly_projection<W: Write>(writer: W, forecast: &ForecastResult) -> Result<()> {
    write_records(writer, &forecast.monthly_breakdown)
}

/// Opens `path` for writing, creating parent directories as needed.
pub fn create_output(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating directory {}", parent.display()))?;
        }
    }
    fs::File::create(path).with_context(|| format!("Creating {}", path.display()))
}

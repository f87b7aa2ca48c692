use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use cli::{CommonArgs, money, parse_horizon, percent};
use forecasting::forecast_table;
use models::{BreakEvenCustomers, BreakEvenTimeline, Scenario};
use settings_loader::PlannerSettings;

#[derive(Parser, Debug)]
#[command(name = "forecast", about = "Scenario forecasts built on the current-period totals.")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forecast scenarios over one or more horizons
    Run {
        /// Horizons in months; defaults to the settings file's forecast_periods
        #[arg(short, long, value_delimiter = ',', value_parser = parse_horizon)]
        periods: Vec<u32>,
        /// Scenario names; defaults to every scenario in the catalog
        #[arg(long = "scenario")]
        scenarios: Vec<String>,
        /// Write the forecast table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the full forecast report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write month-by-month rows for one scenario and horizon, as SCENARIO:MONTHS
        #[arg(long, requires = "monthly_csv")]
        monthly: Option<String>,
        #[arg(long)]
        monthly_csv: Option<PathBuf>,
    },
    /// Every scenario side by side at one horizon
    Compare {
        #[arg(short, long, default_value_t = 12, value_parser = parse_horizon)]
        period: u32,
    },
    /// Customers and months needed to cover fixed costs
    BreakEven {
        #[arg(short, long, default_value_t = 0.0)]
        fixed_costs: f64,
    },
    /// Growth and retention sweeps
    Sensitivity {
        #[arg(short, long, default_value_t = 12, value_parser = parse_horizon)]
        period: u32,
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Scenario catalog maintenance
    #[command(subcommand)]
    Scenario(ScenarioCommand),
}

#[derive(Subcommand, Debug)]
enum ScenarioCommand {
    /// Print every scenario with its assumptions
    List,
    /// Add a scenario, or replace one with the same name, and save the settings
    Add {
        name: String,
        /// Annual growth rate, e.g. 0.15
        #[arg(long)]
        growth: f64,
        /// Monthly retention rate within [0, 1], e.g. 0.9
        #[arg(long)]
        retention: f64,
    },
    /// Remove a scenario and save the settings
    Remove { name: String },
    /// Restore the four built-in scenarios and save the settings
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.common.start()?;
    let currency = settings.currency.clone();
    let periods_default = settings.forecast_periods.clone();
    let sensitivity = settings.sensitivity.clone();
    let session = settings.clone().into_session();
    let forecaster = session.forecaster();

    match cli.command {
        Command::Run {
            periods,
            scenarios,
            csv,
            json,
            monthly,
            monthly_csv,
        } => {
            let periods = if periods.is_empty() { periods_default } else { periods };
            let scenarios = if scenarios.is_empty() {
                session.scenarios().names()
            } else {
                scenarios
            };

            let report = forecaster.generate_forecast(&periods, &scenarios);
            if report.scenarios_used.is_empty() {
                return Err(anyhow!("none of the requested scenarios exist: {}", scenarios.join(", ")));
            }

            let rows = forecast_table(&report);
            println!(
                "{:<14} {:>6} {:>18} {:>18} {:>8} {:>10} {:>8} {:>7}",
                "Scenario", "Months", "Revenue", "Profit", "Margin", "Customers", "Growth", "Risk"
            );
            for r in &rows {
                println!(
                    "{:<14} {:>6} {:>18} {:>18} {:>8} {:>10.0} {:>8} {:>7}",
                    r.scenario,
                    r.period_months,
                    money(r.total_revenue, &currency),
                    money(r.total_profit, &currency),
                    percent(r.profit_margin),
                    r.final_customers,
                    percent(r.customer_growth),
                    r.risk_level.as_str()
                );
            }

            if let Some(path) = csv {
                reports::write_forecast_table(reports::create_output(&path)?, &rows)
                    .context("write forecast CSV")?;
                println!("Wrote {}", path.display());
            }
            if let Some(path) = json {
                reports::write_json(&reports::envelope("Forecast", &currency, &report), &path)
                    .context("write forecast JSON")?;
                println!("Wrote {}", path.display());
            }
            if let (Some(selector), Some(path)) = (monthly, monthly_csv) {
                let (name, months) = parse_selector(&selector)?;
                let forecast = report
                    .forecast(name, months)
                    .ok_or_else(|| anyhow!("no forecast for {name} over {months} months"))?;
                reports::write_monthly_projection(reports::create_output(&path)?, forecast)
                    .context("write monthly CSV")?;
                println!("Wrote {}", path.display());
            }
        }
        Command::Compare { period } => {
            println!(
                "{:<14} {:>18} {:>18} {:>8} {:>10} {:>8} {:>7} {:>9} {:>7}",
                "Scenario", "Revenue", "Profit", "Margin", "Customers", "Growth", "Rate", "Retention", "Risk"
            );
            for c in forecaster.compare_scenarios(period) {
                println!(
                    "{:<14} {:>18} {:>18} {:>8} {:>10.0} {:>8} {:>7} {:>9} {:>7}",
                    c.scenario,
                    money(c.total_revenue, &currency),
                    money(c.total_profit, &currency),
                    percent(c.profit_margin),
                    c.final_customers,
                    percent(c.customer_growth),
                    percent(c.growth_rate * 100.0),
                    percent(c.retention_rate * 100.0),
                    c.risk_level.as_str()
                );
            }
        }
        Command::BreakEven { fixed_costs } => {
            for r in forecaster.break_even_analysis(fixed_costs) {
                let customers = match r.break_even_customers {
                    BreakEvenCustomers::Customers(n) => format!("{n:.0} customers"),
                    BreakEvenCustomers::Undefined => "undefined (no profit per customer)".to_string(),
                };
                let months = match r.months_to_break_even {
                    BreakEvenTimeline::Months(m) => format!("{m:.1} months"),
                    BreakEvenTimeline::Never => "never".to_string(),
                };
                println!(
                    "{:<14} break-even at {} (now {}), reached in {}, {:.2}% monthly growth",
                    r.scenario, customers, r.current_customers, months, r.monthly_growth_rate
                );
            }
        }
        Command::Sensitivity { period, json } => {
            let report = forecaster.sensitivity_analysis(period, &sensitivity);
            println!("Growth rate (retention {}):", percent(sensitivity.base_retention * 100.0));
            for p in &report.growth_rate_sensitivity {
                println!(
                    "  {:>7} {:>18} {:>18}",
                    percent(p.parameter_value * 100.0),
                    money(p.total_revenue, &currency),
                    money(p.total_profit, &currency)
                );
            }
            println!("Retention rate (growth {}):", percent(sensitivity.base_growth * 100.0));
            for p in &report.retention_rate_sensitivity {
                println!(
                    "  {:>7} {:>18} {:>18} {:>10.0}",
                    percent(p.parameter_value * 100.0),
                    money(p.total_revenue, &currency),
                    money(p.total_profit, &currency),
                    p.final_customers
                );
            }
            if let Some(path) = json {
                reports::write_json(&reports::envelope("Sensitivity", &currency, &report), &path)
                    .context("write sensitivity JSON")?;
                println!("Wrote {}", path.display());
            }
        }
        Command::Scenario(cmd) => run_scenario(cmd, settings, &cli.common)?,
    }
    Ok(())
}

fn run_scenario(cmd: ScenarioCommand, settings: PlannerSettings, common: &CommonArgs) -> Result<()> {
    let mut session = settings.clone().into_session();
    match cmd {
        ScenarioCommand::List => {
            println!("{:<16} {:>8} {:>9} {:>7} {:>9}", "Scenario", "Growth", "Retention", "Risk", "Overrides");
            for s in session.scenarios().iter() {
                println!(
                    "{:<16} {:>8} {:>9} {:>7} {:>9}",
                    s.name,
                    percent(s.growth_rate * 100.0),
                    percent(s.retention_rate * 100.0),
                    s.risk_level().as_str(),
                    if s.has_overrides() { "yes" } else { "no" }
                );
            }
            return Ok(());
        }
        ScenarioCommand::Add {
            name,
            growth,
            retention,
        } => session.upsert_scenario(Scenario::new(name, growth, retention)?)?,
        ScenarioCommand::Remove { name } => {
            session
                .remove_scenario(&name)
                .ok_or_else(|| anyhow!("no scenario named {name:?}"))?;
        }
        ScenarioCommand::Reset => session.reset_scenarios_to_defaults(),
    }
    common.save_session(settings, &session, "Scenarios")
}

/// `Moderate:12` -> ("Moderate", 12)
fn parse_selector(raw: &str) -> Result<(&str, u32)> {
    let (name, months) = raw
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("expected SCENARIO:MONTHS, got {raw:?}"))?;
    let months = parse_horizon(months).with_context(|| format!("months in {raw:?}"))?;
    Ok((name, months))
}

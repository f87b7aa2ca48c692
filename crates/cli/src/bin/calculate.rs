use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::{
    CommonArgs, ServiceArgs, money, parse_component, parse_horizon, parse_tier, parse_volume_adjustment,
    percent,
};
use models::{BreakEvenCustomers, PriceComponent, PriceEntry, SubscriptionCount, SubscriptionKey, SubscriptionTier};
use settings_loader::{PlannerSettings, Session};

#[derive(Parser, Debug)]
#[command(name = "calculate", about = "Current-period revenue, cost and profit for the subscription business.")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals, subscriptions and services for the current period (default)
    Summary,
    /// Every tier and duration, including combinations without customers
    Packages,
    /// Subscriptions ranked by total profit
    Ranking,
    /// Period totals with subscription volumes scaled, e.g. `Boom=1.5:1.2`
    Volume {
        #[arg(required = true, value_parser = parse_volume_adjustment)]
        scenarios: Vec<(String, models::VolumeAdjustment)>,
    },
    /// Compounding growth of the current monthly figures
    GrowthImpact {
        /// Monthly growth rate, e.g. 0.05
        #[arg(short, long)]
        rate: f64,
        #[arg(short, long, default_value_t = 12, value_parser = parse_horizon)]
        periods: u32,
    },
    /// Headline KPIs, automated insights and recommendations
    Insights {
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Write the breakdown CSV and/or the executive summary JSON
    Export {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Pricing catalog maintenance
    #[command(subcommand)]
    Pricing(PricingCommand),
    /// Customer counts and service quantities
    #[command(subcommand)]
    Inputs(InputsCommand),
}

#[derive(Subcommand, Debug)]
enum PricingCommand {
    /// Print or write the pricing catalog as JSON
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the pricing catalog with a JSON document and save the settings
    Import { file: PathBuf },
    /// Multiply every price, e.g. 1.1 for +10%, and save the settings
    Scale { multiplier: f64 },
    /// Change one component's cost and/or selling price and save the settings
    Set {
        #[arg(value_parser = parse_tier)]
        tier: SubscriptionTier,
        /// Price list key, e.g. mealsPerMonth
        #[arg(value_parser = parse_component)]
        component: PriceComponent,
        #[arg(long)]
        cost: Option<f64>,
        #[arg(long)]
        selling: Option<f64>,
    },
    /// Set a tier's flat digital profit and save the settings
    DigitalProfit {
        #[arg(value_parser = parse_tier)]
        tier: SubscriptionTier,
        amount: f64,
    },
    /// Restore the built-in price lists and save the settings
    Reset,
}

#[derive(Subcommand, Debug)]
enum InputsCommand {
    /// Print customer and renewal counts and service quantities
    Show,
    /// Set one package's counts, e.g. `VIP_1_month --customers 60`, and save the settings
    Set {
        key: SubscriptionKey,
        #[arg(long)]
        customers: Option<u32>,
        #[arg(long)]
        renewals: Option<u32>,
    },
    /// Change service quantities or fees and save the settings
    Services(ServiceArgs),
    /// Restore the default counts and save the settings
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.common.start()?;
    let currency = settings.currency.clone();
    let session = settings.clone().into_session();

    match cli.command.unwrap_or(Command::Summary) {
        Command::Summary => print_summary(&session, &currency),
        Command::Packages => print_packages(&settings, &currency),
        Command::Ranking => {
            let results = session.results();
            println!("{:<4} {:<20} {:>16} {:>8} {:>10} {:>16}", "#", "Subscription", "Profit", "Margin", "Customers", "Score");
            for r in revenue_engine::performance_ranking(&results) {
                println!(
                    "{:<4} {:<20} {:>16} {:>8} {:>10} {:>16.0}",
                    r.rank,
                    r.subscription,
                    money(r.total_profit, &currency),
                    percent(r.profit_margin),
                    r.customers,
                    r.score
                );
            }
        }
        Command::Volume { scenarios } => {
            let results = revenue_engine::volume_scenarios(&settings.pricing, &settings.inputs, &scenarios);
            println!("{:<16} {:>8} {:>8} {:>18} {:>18} {:>8}", "Scenario", "Cust x", "Renew x", "Revenue", "Profit", "Margin");
            for r in results {
                println!(
                    "{:<16} {:>8.2} {:>8.2} {:>18} {:>18} {:>8}",
                    r.name,
                    r.adjustment.customer_multiplier,
                    r.adjustment.renewal_multiplier,
                    money(r.totals.total_revenue, &currency),
                    money(r.totals.total_profit, &currency),
                    percent(r.totals.profit_margin)
                );
            }
        }
        Command::GrowthImpact { rate, periods } => {
            let impact = session.forecaster().growth_impact(rate, periods);
            println!("{:>5} {:>8} {:>18} {:>18} {:>20}", "Month", "Factor", "Revenue", "Profit", "Cumulative profit");
            for row in &impact.projections {
                println!(
                    "{:>5} {:>8.3} {:>18} {:>18} {:>20}",
                    row.month,
                    row.growth_factor,
                    money(row.monthly_revenue, &currency),
                    money(row.monthly_profit, &currency),
                    money(row.cumulative_profit, &currency)
                );
            }
            println!(
                "Total over {} months: revenue {}, profit {}",
                impact.periods,
                money(impact.total_projected_revenue, &currency),
                money(impact.total_projected_profit, &currency)
            );
        }
        Command::Export { csv, json } => {
            let results = session.results();
            if let Some(path) = csv {
                let file = reports::create_output(&path)?;
                reports::write_breakdown(file, &results).context("write breakdown CSV")?;
                println!("Wrote {}", path.display());
            }
            if let Some(path) = json {
                reports::write_json(&reports::executive_summary(&results, &currency), &path)
                    .context("write executive summary")?;
                println!("Wrote {}", path.display());
            }
        }
        Command::Insights { json } => {
            let results = session.results();
            let report = revenue_engine::insights_report(&results);
            print_insights(&report, &currency);
            if let Some(path) = json {
                reports::write_json(&reports::envelope("Insights", &currency, &report), &path)
                    .context("write insights JSON")?;
                println!("Wrote {}", path.display());
            }
        }
        Command::Pricing(cmd) => run_pricing(cmd, session, settings, &cli.common)?,
        Command::Inputs(cmd) => run_inputs(cmd, session, settings, &cli.common)?,
    }
    Ok(())
}

fn print_summary(session: &Session, currency: &str) {
    let results = session.results();
    let t = &results.totals;
    println!("Revenue   : {}", money(t.total_revenue, currency));
    println!("Cost      : {}", money(t.total_cost, currency));
    println!("Profit    : {} ({})", money(t.total_profit, currency), percent(t.profit_margin));
    println!("Customers : {}", t.total_customers);
    println!(
        "Per customer: revenue {}, cost {}, profit {}",
        money(t.revenue_per_customer, currency),
        money(t.cost_per_customer, currency),
        money(t.profit_per_customer, currency)
    );
    if let Some(best) = &results.summary.best_subscription {
        println!(
            "Best subscription: {} ({})",
            best,
            money(results.summary.best_subscription_profit, currency)
        );
    }

    println!();
    for line in &results.breakdown {
        println!(
            "{:<20} {:<24} {:>16} {:>16} {:>8}  {}",
            line.category.as_str(),
            line.name,
            money(line.revenue, currency),
            money(line.profit, currency),
            percent(line.margin),
            line.details
        );
    }
}

fn print_insights(report: &models::InsightsReport, currency: &str) {
    let k = &report.kpis;
    println!("Revenue / cost      : {:.2}", k.revenue_cost_ratio);
    match k.break_even_customers {
        BreakEvenCustomers::Customers(n) => println!("Break-even customers: {n:.0}"),
        BreakEvenCustomers::Undefined => println!("Break-even customers: undefined (no profit per customer)"),
    }
    println!("Market penetration  : {}", percent(k.market_penetration));
    println!("Acquisition cost    : {}", money(k.customer_acquisition_cost, currency));
    println!("Lifetime value      : {}", money(k.customer_lifetime_value, currency));
    println!("LTV / CAC           : {:.1}", k.ltv_cac_ratio);

    println!();
    for insight in &report.insights {
        println!("[{}] {}", insight.level.as_str(), insight.message);
    }

    for rec in &report.recommendations {
        println!();
        println!(
            "{} (priority {}, impact {})",
            rec.title,
            rec.priority.as_str(),
            rec.impact.as_str()
        );
        println!("  {}", rec.description);
        for action in &rec.actions {
            println!("  - {action}");
        }
    }
}

fn print_packages(settings: &PlannerSettings, currency: &str) {
    println!(
        "{:<20} {:>9} {:>9} {:>14} {:>14} {:>16} {:>8}",
        "Package", "Customers", "Renewals", "Cost/cust", "Revenue/cust", "Profit", "Margin"
    );
    for row in revenue_engine::package_summary(&settings.pricing, &settings.inputs) {
        println!(
            "{:<20} {:>9} {:>9} {:>14} {:>14} {:>16} {:>8}",
            row.key.display_name(),
            row.customers,
            row.renewals,
            money(row.cost_per_customer, currency),
            money(row.revenue_per_customer, currency),
            money(row.total_profit, currency),
            percent(row.profit_margin)
        );
    }
}

fn run_pricing(
    cmd: PricingCommand,
    mut session: Session,
    settings: PlannerSettings,
    common: &CommonArgs,
) -> Result<()> {
    match cmd {
        PricingCommand::Export { output } => {
            let json = session.export_pricing()?;
            match output {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{json}"),
            }
            return Ok(());
        }
        PricingCommand::Import { file } => {
            let raw = fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            session
                .import_pricing(&raw)
                .with_context(|| format!("importing pricing from {}", file.display()))?;
        }
        PricingCommand::Scale { multiplier } => session.apply_percentage_change(multiplier)?,
        PricingCommand::Set {
            tier,
            component,
            cost,
            selling,
        } => {
            let current = session
                .pricing()
                .price(tier, component)
                .with_context(|| format!("{tier} has no {component} price"))?;
            let entry = PriceEntry::new(cost.unwrap_or(current.cost), selling.unwrap_or(current.selling));
            session.update_price(tier, component, entry)?;
        }
        PricingCommand::DigitalProfit { tier, amount } => session.update_digital_profit(tier, amount)?,
        PricingCommand::Reset => session.reset_pricing_to_defaults(),
    }

    common.save_session(settings, &session, "Pricing")
}

fn run_inputs(
    cmd: InputsCommand,
    mut session: Session,
    settings: PlannerSettings,
    common: &CommonArgs,
) -> Result<()> {
    match cmd {
        InputsCommand::Show => {
            let inputs = session.inputs();
            println!("{:<20} {:>9} {:>9}", "Package", "Customers", "Renewals");
            for key in SubscriptionKey::all() {
                let count = inputs.count(key);
                println!("{:<20} {:>9} {:>9}", key.to_string(), count.customers, count.renewals);
            }
            let q = &inputs.services;
            println!();
            println!("Additional bracelets        : {}", q.additional_bracelets);
            println!("Challenge participants      : {} at {}", q.challenge_participants, q.challenge_fee);
            println!("Adventure participants      : {} at {}", q.adventure_participants, q.adventure_fee);
            println!("Competition participants    : {} at {}", q.competition_participants, q.competition_fee);
            println!("CBYI non-subscribers        : {}", q.cbyi_non_subscribers);
            println!("Bracelets, non-subscribers  : {}", q.bracelets_non_subscribers);
            println!("Car rental customers        : {}", q.car_rental_customers);
            return Ok(());
        }
        InputsCommand::Set {
            key,
            customers,
            renewals,
        } => {
            let current = session.inputs().count(key);
            let count = SubscriptionCount::new(
                customers.unwrap_or(current.customers),
                renewals.unwrap_or(current.renewals),
            );
            session.update_inputs([(key, count)]);
        }
        InputsCommand::Services(args) => {
            let services = args.apply(&session.inputs().services)?;
            session.update_services(services);
        }
        InputsCommand::Reset => session.reset_inputs_to_defaults(),
    }

    common.save_session(settings, &session, "Inputs")
}

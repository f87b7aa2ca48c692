//! Current-period revenue, cost and profit for every subscription package and
//! ancillary service.
//!
//! Everything here is a pure function of a [`PricingCatalog`] and a
//! [`CustomerInput`]; nothing is cached, results are recomputed on demand.

pub mod insights;

use models::*;
use tracing::debug;

pub use crate::insights::{business_insights, business_kpis, insights_report, recommendations};

/// `part / whole * 100`, or 0 when `whole` is not positive.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

fn per_customer(amount: f64, customers: u64) -> f64 {
    if customers > 0 {
        amount / customers as f64
    } else {
        0.0
    }
}

/// Per-customer cost and revenue of one package. Non-custom tiers add their
/// flat digital profit to the revenue.
pub fn package_cost(catalog: &PricingCatalog, key: SubscriptionKey) -> PackageCost {
    let pricing = catalog.tier(key.tier);
    let entries = pricing.package_entries(key.duration);

    let cost: f64 = entries.iter().map(|e| e.cost).sum();
    let mut revenue: f64 = entries.iter().map(|e| e.selling).sum();
    if key.tier.earns_digital_profit() {
        revenue += pricing.digital_profit();
    }

    PackageCost {
        cost,
        revenue,
        profit: revenue - cost,
    }
}

fn subscription_row(
    catalog: &PricingCatalog,
    key: SubscriptionKey,
    count: SubscriptionCount,
) -> PackageSummaryRow {
    let package = package_cost(catalog, key);
    let customers = count.customers as f64;

    let total_cost = package.cost * customers;
    // Renewals are charged at a flat rate per duration, not the tier's price.
    let renewal_revenue = count.renewals as f64 * key.duration.renewal_price();
    let total_revenue = package.revenue * customers + renewal_revenue;
    let total_profit = total_revenue - total_cost;

    PackageSummaryRow {
        key,
        customers: count.customers,
        renewals: count.renewals,
        cost_per_customer: package.cost,
        revenue_per_customer: package.revenue,
        total_cost,
        total_revenue,
        total_profit,
        profit_margin: percent_of(total_profit, total_revenue),
        renewal_revenue,
    }
}

/// One row per (tier, duration), including combinations without customers.
pub fn package_summary(catalog: &PricingCatalog, inputs: &CustomerInput) -> Vec<PackageSummaryRow> {
    SubscriptionKey::all()
        .into_iter()
        .map(|key| subscription_row(catalog, key, inputs.count(key)))
        .collect()
}

/// Results for every combination that has at least one customer.
pub fn subscription_results(
    catalog: &PricingCatalog,
    inputs: &CustomerInput,
) -> Vec<SubscriptionResult> {
    package_summary(catalog, inputs)
        .into_iter()
        .filter(|row| row.customers > 0)
        .map(|row| SubscriptionResult {
            key: row.key,
            name: row.key.display_name(),
            customers: row.customers,
            renewals: row.renewals,
            cost_per_customer: row.cost_per_customer,
            revenue_per_customer: row.revenue_per_customer,
            renewal_revenue: row.renewal_revenue,
            total_cost: row.total_cost,
            total_revenue: row.total_revenue,
            total_profit: row.total_profit,
            profit_margin: row.profit_margin,
        })
        .collect()
}

fn service(kind: AncillaryService, cost: f64, revenue: f64) -> ServiceResult {
    ServiceResult {
        service: kind,
        name: kind.display_name().to_string(),
        cost,
        revenue,
        profit: revenue - cost,
    }
}

/// Flat quantity x price figures for the services sold outside subscriptions.
/// Bracelets and car rental are priced from the VIP list, CBYI from Custom.
pub fn additional_services(catalog: &PricingCatalog, inputs: &CustomerInput) -> Vec<ServiceResult> {
    let q = &inputs.services;
    let bracelet = catalog.vip.bracelet;
    let car = catalog.vip.car_one_month;
    let cbyi = catalog.custom.cbyi_one_month;

    let events = q.challenge_fee * q.challenge_participants as f64
        + q.adventure_fee * q.adventure_participants as f64
        + q.competition_fee * q.competition_participants as f64;

    let bracelets = q.additional_bracelets as f64;
    let cbyi_customers = q.cbyi_non_subscribers as f64;
    let ns_bracelets = q.bracelets_non_subscribers as f64;
    let car_customers = q.car_rental_customers as f64;

    vec![
        service(AncillaryService::EventsAndChallenges, 0.0, events),
        service(
            AncillaryService::AdditionalBracelets,
            bracelet.cost * bracelets,
            bracelet.selling * bracelets,
        ),
        service(
            AncillaryService::CbyiServices,
            cbyi.cost * cbyi_customers,
            cbyi.selling * cbyi_customers,
        ),
        service(
            AncillaryService::NonSubscriberBracelets,
            bracelet.cost * ns_bracelets,
            bracelet.selling * ns_bracelets,
        ),
        service(
            AncillaryService::CarRental,
            car.cost * car_customers,
            car.selling * car_customers,
        ),
    ]
}

/// Sums the subscription and service lines. Only subscriptions count as
/// customers.
pub fn compute_totals(subscriptions: &[SubscriptionResult], services: &[ServiceResult]) -> PeriodTotals {
    let mut total_cost = 0.0;
    let mut total_revenue = 0.0;
    let mut total_customers: u64 = 0;

    for sub in subscriptions {
        total_cost += sub.total_cost;
        total_revenue += sub.total_revenue;
        total_customers += sub.customers as u64;
    }
    for svc in services {
        total_cost += svc.cost;
        total_revenue += svc.revenue;
    }

    let total_profit = total_revenue - total_cost;
    PeriodTotals {
        total_revenue,
        total_cost,
        total_profit,
        profit_margin: percent_of(total_profit, total_revenue),
        total_customers,
        revenue_per_customer: per_customer(total_revenue, total_customers),
        cost_per_customer: per_customer(total_cost, total_customers),
        profit_per_customer: per_customer(total_profit, total_customers),
    }
}

/// The best subscription is the one with the highest total profit. On a tie
/// the one that comes first in catalogue order wins.
pub fn best_subscription(subscriptions: &[SubscriptionResult]) -> Option<&SubscriptionResult> {
    subscriptions.iter().fold(None, |best, sub| match best {
        Some(b) if b.total_profit >= sub.total_profit => Some(b),
        _ => Some(sub),
    })
}

fn create_summary(
    totals: &PeriodTotals,
    subscriptions: &[SubscriptionResult],
    services: &[ServiceResult],
) -> ResultsSummary {
    let best = best_subscription(subscriptions);
    ResultsSummary {
        total_revenue: totals.total_revenue,
        total_profit: totals.total_profit,
        profit_margin: totals.profit_margin,
        total_customers: totals.total_customers,
        subscription_types_count: subscriptions.len(),
        additional_services_count: services.len(),
        best_subscription: best.map(|b| b.name.clone()),
        best_subscription_profit: best.map(|b| b.total_profit).unwrap_or(0.0),
    }
}

fn create_breakdown(subscriptions: &[SubscriptionResult], services: &[ServiceResult]) -> Vec<BreakdownLine> {
    let subs = subscriptions.iter().map(|s| BreakdownLine {
        category: BreakdownCategory::Subscription,
        name: s.name.clone(),
        cost: s.total_cost,
        revenue: s.total_revenue,
        profit: s.total_profit,
        margin: s.profit_margin,
        customers: s.customers,
        details: format!("{} customers, {} renewals", s.customers, s.renewals),
    });
    let svcs = services.iter().map(|s| BreakdownLine {
        category: BreakdownCategory::AdditionalService,
        name: s.name.clone(),
        cost: s.cost,
        revenue: s.revenue,
        profit: s.profit,
        margin: percent_of(s.profit, s.revenue),
        customers: 0,
        details: "Additional service revenue".to_string(),
    });
    subs.chain(svcs).collect()
}

/// Full current-period picture: per subscription, per service, totals,
/// summary and a flat breakdown for reporting.
pub fn compute_comprehensive_results(
    catalog: &PricingCatalog,
    inputs: &CustomerInput,
) -> ComprehensiveResults {
    let subscriptions = subscription_results(catalog, inputs);
    let additional_services = additional_services(catalog, inputs);
    let totals = compute_totals(&subscriptions, &additional_services);
    let summary = create_summary(&totals, &subscriptions, &additional_services);
    let breakdown = create_breakdown(&subscriptions, &additional_services);

    debug!(
        subscriptions = subscriptions.len(),
        customers = totals.total_customers,
        revenue = totals.total_revenue,
        profit = totals.total_profit,
        "computed period results"
    );

    ComprehensiveResults {
        subscriptions,
        additional_services,
        totals,
        summary,
        breakdown,
    }
}

/// Subscriptions ranked by total profit, highest first. Equal profits keep
/// catalogue order.
pub fn performance_ranking(results: &ComprehensiveResults) -> Vec<PerformanceRank> {
    let mut ranked: Vec<&SubscriptionResult> = results.subscriptions.iter().collect();
    ranked.sort_by(|a, b| b.total_profit.total_cmp(&a.total_profit));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, s)| PerformanceRank {
            rank: i + 1,
            subscription: s.name.clone(),
            total_profit: s.total_profit,
            profit_margin: s.profit_margin,
            customers: s.customers,
            revenue_per_customer: s.revenue_per_customer,
            score: s.total_profit * s.profit_margin / 100.0,
        })
        .collect()
}

/// Period totals with subscription volumes scaled by each adjustment. The
/// given input is not modified.
pub fn volume_scenarios(
    catalog: &PricingCatalog,
    inputs: &CustomerInput,
    adjustments: &[(String, VolumeAdjustment)],
) -> Vec<VolumeScenarioResult> {
    adjustments
        .iter()
        .map(|(name, adjustment)| {
            let adjusted =
                inputs.with_multipliers(adjustment.customer_multiplier, adjustment.renewal_multiplier);
            VolumeScenarioResult {
                name: name.clone(),
                adjustment: *adjustment,
                totals: compute_comprehensive_results(catalog, &adjusted).totals,
            }
        })
        .collect()
}

//! Headline KPIs, rule-based insights and strategic recommendations drawn
//! from the current-period results.

use models::*;

use crate::{percent_of, performance_ranking};

/// Customers in the addressable market, used for market penetration.
pub const ADDRESSABLE_MARKET: f64 = 10_000.0;
/// Share of total cost counted as marketing spend for the acquisition cost.
pub const MARKETING_COST_SHARE: f64 = 0.15;
/// Periods a customer is expected to stay, for the lifetime value.
pub const LIFETIME_PERIODS: f64 = 4.0;
/// At most this many recommendations are returned.
pub const MAX_RECOMMENDATIONS: usize = 4;

pub fn business_kpis(totals: &PeriodTotals) -> BusinessKpis {
    let customers = totals.total_customers as f64;
    let revenue_cost_ratio = if totals.total_cost > 0.0 {
        totals.total_revenue / totals.total_cost
    } else {
        0.0
    };
    let break_even_customers = if totals.profit_per_customer > 0.0 {
        BreakEvenCustomers::Customers(totals.total_cost / totals.profit_per_customer)
    } else {
        BreakEvenCustomers::Undefined
    };
    let customer_acquisition_cost = if customers > 0.0 {
        totals.total_cost * MARKETING_COST_SHARE / customers
    } else {
        0.0
    };
    let customer_lifetime_value = totals.revenue_per_customer * LIFETIME_PERIODS;
    let ltv_cac_ratio = if customer_acquisition_cost > 0.0 {
        customer_lifetime_value / customer_acquisition_cost
    } else {
        0.0
    };

    BusinessKpis {
        revenue_cost_ratio,
        break_even_customers,
        market_penetration: customers / ADDRESSABLE_MARKET * 100.0,
        customer_acquisition_cost,
        customer_lifetime_value,
        ltv_cac_ratio,
    }
}

/// Additional-service revenue as a percent of total revenue.
pub fn service_revenue_share(results: &ComprehensiveResults) -> f64 {
    let services: f64 = results.additional_services.iter().map(|s| s.revenue).sum();
    percent_of(services, results.totals.total_revenue)
}

/// Profit shares are only judged while total profit is positive.
pub fn business_insights(results: &ComprehensiveResults, ranking: &[PerformanceRank]) -> Vec<Insight> {
    let totals = &results.totals;
    let mut insights = Vec::new();

    let margin = totals.profit_margin;
    let (level, message) = if margin > 40.0 {
        (
            InsightLevel::Success,
            format!("Excellent profit margin of {margin:.1}% indicates strong pricing power and operational efficiency."),
        )
    } else if margin > 25.0 {
        (
            InsightLevel::Info,
            format!("Healthy profit margin of {margin:.1}% provides good financial stability."),
        )
    } else {
        (
            InsightLevel::Warning,
            format!(
                "Profit margin of {margin:.1}% may indicate opportunities for cost optimization or pricing adjustments."
            ),
        )
    };
    insights.push(Insight {
        topic: InsightTopic::ProfitMargin,
        level,
        value: margin,
        message,
    });

    if let Some(top) = ranking.first().filter(|_| totals.total_profit > 0.0) {
        let share = percent_of(top.total_profit, totals.total_profit);
        let judged = if share > 60.0 {
            Some((
                InsightLevel::Warning,
                format!("High concentration risk: {} generates {share:.1}% of total profit.", top.subscription),
            ))
        } else if share > 40.0 {
            Some((
                InsightLevel::Info,
                format!("{} is the profit leader at {share:.1}% of total profit.", top.subscription),
            ))
        } else {
            None
        };
        if let Some((level, message)) = judged {
            insights.push(Insight {
                topic: InsightTopic::ProfitConcentration,
                level,
                value: share,
                message,
            });
        }
    }

    if totals.revenue_per_customer > 5_000.0 {
        insights.push(Insight {
            topic: InsightTopic::CustomerValue,
            level: InsightLevel::Success,
            value: totals.revenue_per_customer,
            message: format!(
                "High customer value with {:.0} average revenue per customer.",
                totals.revenue_per_customer
            ),
        });
    }

    let service_share = service_revenue_share(results);
    if service_share < 10.0 {
        insights.push(Insight {
            topic: InsightTopic::AdditionalServices,
            level: InsightLevel::Info,
            value: service_share,
            message: format!(
                "Additional services represent only {service_share:.1}% of revenue, a potential growth opportunity."
            ),
        });
    } else if service_share > 25.0 {
        insights.push(Insight {
            topic: InsightTopic::AdditionalServices,
            level: InsightLevel::Success,
            value: service_share,
            message: format!("Strong additional services generating {service_share:.1}% of total revenue."),
        });
    }

    insights
}

fn recommendation(
    kind: RecommendationKind,
    title: &str,
    priority: Priority,
    impact: Priority,
    description: &str,
    actions: [&str; 4],
) -> Recommendation {
    Recommendation {
        kind,
        title: title.to_string(),
        priority,
        impact,
        description: description.to_string(),
        actions: actions.iter().map(|a| a.to_string()).collect(),
    }
}

pub fn recommendations(results: &ComprehensiveResults, ranking: &[PerformanceRank]) -> Vec<Recommendation> {
    let totals = &results.totals;
    let mut out = Vec::new();

    if totals.profit_margin < 30.0 {
        out.push(recommendation(
            RecommendationKind::PricingOptimization,
            "Pricing Optimization",
            Priority::High,
            Priority::High,
            "Current profit margins suggest opportunities for pricing adjustments to improve profitability.",
            [
                "Analyze competitor pricing for similar services",
                "Test price increases on low-margin subscription types",
                "Consider value-added bundles to justify premium pricing",
                "Implement dynamic pricing based on demand",
            ],
        ));
    }

    if ranking.len() > 1 && totals.total_profit > 0.0 {
        let top_two: f64 = ranking.iter().take(2).map(|r| r.total_profit).sum();
        if percent_of(top_two, totals.total_profit) > 70.0 {
            out.push(recommendation(
                RecommendationKind::Diversification,
                "Diversification Strategy",
                Priority::Medium,
                Priority::Medium,
                "High revenue concentration in top subscription types creates business risk.",
                [
                    "Develop marketing campaigns for underperforming subscription types",
                    "Create incentives to balance customer distribution",
                    "Investigate barriers to adoption for lower-performing tiers",
                    "Consider new subscription options to broaden appeal",
                ],
            ));
        }
    }

    if service_revenue_share(results) < 15.0 {
        out.push(recommendation(
            RecommendationKind::ServicesExpansion,
            "Additional Services Expansion",
            Priority::Medium,
            Priority::High,
            "Additional services represent untapped revenue potential beyond core subscriptions.",
            [
                "Survey customers about desired additional services",
                "Expand marketing of existing additional services",
                "Bundle services with subscription packages",
                "Develop new high-margin service offerings",
            ],
        ));
    }

    if totals.total_customers < 1_000 {
        out.push(recommendation(
            RecommendationKind::CustomerAcquisition,
            "Customer Acquisition Acceleration",
            Priority::High,
            Priority::High,
            "Scale customer base to achieve economies of scale and market leadership.",
            [
                "Increase digital marketing investment",
                "Implement referral programs for existing customers",
                "Expand into new geographic markets",
                "Partner with complementary businesses for customer acquisition",
            ],
        ));
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}

pub fn insights_report(results: &ComprehensiveResults) -> InsightsReport {
    let ranking = performance_ranking(results);
    InsightsReport {
        kpis: business_kpis(&results.totals),
        insights: business_insights(results, &ranking),
        recommendations: recommendations(results, &ranking),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_comprehensive_results;

    const EPS: f64 = 1e-9;

    fn totals(revenue: f64, cost: f64, customers: u64) -> PeriodTotals {
        let profit = revenue - cost;
        let per = |amount: f64| if customers > 0 { amount / customers as f64 } else { 0.0 };
        PeriodTotals {
            total_revenue: revenue,
            total_cost: cost,
            total_profit: profit,
            profit_margin: percent_of(profit, revenue),
            total_customers: customers,
            revenue_per_customer: per(revenue),
            cost_per_customer: per(cost),
            profit_per_customer: per(profit),
        }
    }

    /// Results with the given totals and one service line earning
    /// `service_revenue`.
    fn results(totals: PeriodTotals, service_revenue: f64) -> ComprehensiveResults {
        let mut results = compute_comprehensive_results(&PricingCatalog::default(), &CustomerInput::empty());
        results.totals = totals;
        results.additional_services = vec![ServiceResult {
            service: AncillaryService::ALL[0],
            name: AncillaryService::ALL[0].display_name().to_string(),
            cost: 0.0,
            revenue: service_revenue,
            profit: service_revenue,
        }];
        results
    }

    fn rank(subscription: &str, total_profit: f64) -> PerformanceRank {
        PerformanceRank {
            rank: 0,
            subscription: subscription.to_string(),
            total_profit,
            profit_margin: 0.0,
            customers: 0,
            revenue_per_customer: 0.0,
            score: 0.0,
        }
    }

    fn levels(insights: &[Insight], topic: InsightTopic) -> Vec<InsightLevel> {
        insights.iter().filter(|i| i.topic == topic).map(|i| i.level).collect()
    }

    #[test]
    fn test_kpis() {
        let kpis = business_kpis(&totals(200_000.0, 100_000.0, 50));
        assert!((kpis.revenue_cost_ratio - 2.0).abs() < EPS);
        // 2000 profit per customer covers 100k of cost at 50 customers
        assert_eq!(kpis.break_even_customers, BreakEvenCustomers::Customers(50.0));
        assert!((kpis.market_penetration - 0.5).abs() < EPS);
        assert!((kpis.customer_acquisition_cost - 300.0).abs() < EPS);
        assert!((kpis.customer_lifetime_value - 16_000.0).abs() < EPS);
        assert!((kpis.ltv_cac_ratio - 16_000.0 / 300.0).abs() < EPS);
    }

    #[test]
    fn test_kpis_without_customers_or_cost() {
        let kpis = business_kpis(&PeriodTotals::default());
        assert_eq!(kpis.revenue_cost_ratio, 0.0);
        assert_eq!(kpis.break_even_customers, BreakEvenCustomers::Undefined);
        assert_eq!(kpis.customer_acquisition_cost, 0.0);
        assert_eq!(kpis.ltv_cac_ratio, 0.0);

        let losing = business_kpis(&totals(50_000.0, 80_000.0, 10));
        assert_eq!(losing.break_even_customers, BreakEvenCustomers::Undefined);
    }

    #[test]
    fn test_margin_insight_levels() {
        let judge = |revenue: f64, cost: f64| {
            let insights = business_insights(&results(totals(revenue, cost, 10), 0.0), &[]);
            levels(&insights, InsightTopic::ProfitMargin)
        };
        assert_eq!(judge(100.0, 50.0), vec![InsightLevel::Success]);
        assert_eq!(judge(100.0, 70.0), vec![InsightLevel::Info]);
        assert_eq!(judge(100.0, 75.0), vec![InsightLevel::Warning]);
    }

    #[test]
    fn test_concentration_insight_levels() {
        let r = results(totals(100_000.0, 50_000.0, 10), 0.0);
        let judge = |top: f64| levels(&business_insights(&r, &[rank("VIP - 1 Month", top)]), InsightTopic::ProfitConcentration);
        assert_eq!(judge(35_000.0), vec![InsightLevel::Warning]);
        assert_eq!(judge(25_000.0), vec![InsightLevel::Info]);
        assert!(judge(10_000.0).is_empty());

        let message = &business_insights(&r, &[rank("VIP - 1 Month", 35_000.0)])[1].message;
        assert!(message.contains("VIP - 1 Month") && message.contains("70.0%"), "{message}");
    }

    #[test]
    fn test_no_concentration_insight_without_profit() {
        let r = results(totals(50_000.0, 50_000.0, 10), 0.0);
        let insights = business_insights(&r, &[rank("VIP - 1 Month", 1_000.0)]);
        assert!(levels(&insights, InsightTopic::ProfitConcentration).is_empty());
        assert!(insights.iter().all(|i| i.value.is_finite()));

        let losing = results(totals(40_000.0, 50_000.0, 10), 0.0);
        let insights = business_insights(&losing, &[rank("VIP - 1 Month", -2_000.0)]);
        assert!(levels(&insights, InsightTopic::ProfitConcentration).is_empty());
    }

    #[test]
    fn test_customer_value_insight() {
        let high = business_insights(&results(totals(60_000.0, 10_000.0, 10), 0.0), &[]);
        assert_eq!(levels(&high, InsightTopic::CustomerValue), vec![InsightLevel::Success]);
        let low = business_insights(&results(totals(50_000.0, 10_000.0, 10), 0.0), &[]);
        assert!(levels(&low, InsightTopic::CustomerValue).is_empty());
    }

    #[test]
    fn test_service_share_insight_levels() {
        let judge = |service_revenue: f64| {
            let insights = business_insights(&results(totals(100_000.0, 50_000.0, 10), service_revenue), &[]);
            levels(&insights, InsightTopic::AdditionalServices)
        };
        assert_eq!(judge(5_000.0), vec![InsightLevel::Info]);
        assert!(judge(20_000.0).is_empty());
        assert_eq!(judge(30_000.0), vec![InsightLevel::Success]);

        // No revenue at all counts as a 0% share.
        let none = business_insights(&results(PeriodTotals::default(), 0.0), &[]);
        assert_eq!(levels(&none, InsightTopic::AdditionalServices), vec![InsightLevel::Info]);
    }

    #[test]
    fn test_recommendations_by_rule() {
        let kinds = |r: &ComprehensiveResults, ranking: &[PerformanceRank]| -> Vec<RecommendationKind> {
            recommendations(r, ranking).iter().map(|r| r.kind).collect()
        };

        // 50% margin, 20% services, 2000 customers, balanced profit
        let healthy = results(totals(100_000.0, 50_000.0, 2_000), 20_000.0);
        let balanced = [rank("a", 20_000.0), rank("b", 10_000.0), rank("c", 20_000.0)];
        assert!(kinds(&healthy, &balanced).is_empty());

        let thin = results(totals(100_000.0, 80_000.0, 2_000), 20_000.0);
        assert_eq!(kinds(&thin, &[]), vec![RecommendationKind::PricingOptimization]);

        let concentrated = [rank("a", 30_000.0), rank("b", 10_000.0), rank("c", 10_000.0)];
        assert_eq!(kinds(&healthy, &concentrated), vec![RecommendationKind::Diversification]);
        assert!(kinds(&healthy, &concentrated[..1]).is_empty());

        let few_services = results(totals(100_000.0, 50_000.0, 2_000), 10_000.0);
        assert_eq!(kinds(&few_services, &balanced), vec![RecommendationKind::ServicesExpansion]);

        let small = results(totals(100_000.0, 50_000.0, 999), 20_000.0);
        assert_eq!(kinds(&small, &balanced), vec![RecommendationKind::CustomerAcquisition]);
    }

    #[test]
    fn test_recommendations_capped_and_ordered() {
        let struggling = results(totals(100_000.0, 90_000.0, 10), 0.0);
        let ranking = [rank("a", 9_000.0), rank("b", 1_000.0)];
        let recs = recommendations(&struggling, &ranking);
        let kinds: Vec<RecommendationKind> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::PricingOptimization,
                RecommendationKind::Diversification,
                RecommendationKind::ServicesExpansion,
                RecommendationKind::CustomerAcquisition,
            ]
        );
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[1].impact, Priority::Medium);
        assert!(recs.iter().all(|r| r.actions.len() == 4));
    }

    #[test]
    fn test_no_diversification_without_profit() {
        let even = results(totals(50_000.0, 50_000.0, 2_000), 20_000.0);
        let ranking = [rank("a", 5_000.0), rank("b", -5_000.0)];
        assert!(recommendations(&even, &ranking)
            .iter()
            .all(|r| r.kind != RecommendationKind::Diversification));
    }

    #[test]
    fn test_report_from_default_inputs() {
        let results = compute_comprehensive_results(&PricingCatalog::default(), &CustomerInput::default());
        let report = insights_report(&results);
        assert_eq!(report.insights[0].topic, InsightTopic::ProfitMargin);
        assert!(report.recommendations.len() <= MAX_RECOMMENDATIONS);
        assert_eq!(report.kpis, business_kpis(&results.totals));
    }
}

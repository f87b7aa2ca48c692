use models::{BreakEvenCustomers, BreakEvenResult, BreakEvenTimeline, PeriodTotals, Scenario};

/// Customers needed so that per-customer profit covers `fixed_costs`.
pub fn break_even_customers(fixed_costs: f64, avg_profit_per_customer: f64) -> BreakEvenCustomers {
    if avg_profit_per_customer > 0.0 {
        BreakEvenCustomers::Customers(fixed_costs / avg_profit_per_customer)
    } else {
        BreakEvenCustomers::Undefined
    }
}

/// Months of geometric growth at `monthly_growth_rate` to go from `current`
/// to `target` customers.
pub fn months_to_reach(target: f64, current: f64, monthly_growth_rate: f64) -> BreakEvenTimeline {
    if current >= target {
        BreakEvenTimeline::Months(0.0)
    } else if monthly_growth_rate > 0.0 && current > 0.0 {
        BreakEvenTimeline::Months((target / current).ln() / (1.0 + monthly_growth_rate).ln())
    } else {
        BreakEvenTimeline::Never
    }
}

pub fn analyze(totals: &PeriodTotals, scenario: &Scenario, fixed_costs: f64) -> BreakEvenResult {
    let avg_profit_per_customer = totals.profit_per_customer;
    let current_customers = totals.total_customers;
    let monthly_growth_rate = scenario.growth_rate / 12.0;

    let customers = break_even_customers(fixed_costs, avg_profit_per_customer);
    let timeline = match customers {
        BreakEvenCustomers::Customers(target) => {
            months_to_reach(target, current_customers as f64, monthly_growth_rate)
        }
        BreakEvenCustomers::Undefined => BreakEvenTimeline::Never,
    };

    BreakEvenResult {
        scenario: scenario.name.clone(),
        break_even_customers: customers,
        current_customers,
        months_to_break_even: timeline,
        monthly_growth_rate: monthly_growth_rate * 100.0,
        avg_profit_per_customer,
    }
}

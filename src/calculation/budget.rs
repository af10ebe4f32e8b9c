//! Consolidated budget aggregation.
//!
//! Packages the monthly figures produced by the rest of the pipeline into
//! contract totals, an evenly divided month-by-month view and a per-year
//! projection with costs readjusted for inflation.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AdditionalCost, MarketVariables, ProjectInfo};

use super::margin::MarginResult;
use super::tax::TaxBreakdown;

const MONTHS_PER_YEAR: u32 = 12;

/// Everything the budget is built from.
#[derive(Debug, Clone, Copy)]
pub struct BudgetInputs<'a> {
    /// Contract duration and start date.
    pub project: &'a ProjectInfo,
    /// Monthly team cost.
    pub team_monthly_cost: Decimal,
    /// Additional costs, infrastructure included.
    pub other_costs: &'a [AdditionalCost],
    /// Monthly taxes.
    pub taxes: &'a TaxBreakdown,
    /// Monthly price.
    pub margin: &'a MarginResult,
    /// Inflation for the yearly projection.
    pub market: &'a MarketVariables,
}

/// One month of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    /// 1-based month number.
    pub month: u32,
    /// First day of the month, when the contract start date is known.
    pub month_start: Option<NaiveDate>,
    /// Price billed in the month.
    pub revenue: Decimal,
    /// Team and additional costs.
    pub costs: Decimal,
    /// Taxes due.
    pub taxes: Decimal,
    /// Revenue minus costs and taxes.
    pub profit: Decimal,
    /// Profit over revenue, in percent.
    pub margin_percent: Decimal,
}

/// One contract year with inflation-readjusted costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// 1-based contract year.
    pub year: u32,
    /// Months of the contract falling in this year.
    pub months: u32,
    /// Revenue for the year.
    pub revenue: Decimal,
    /// Costs for the year after readjustment.
    pub costs: Decimal,
    /// Taxes for the year.
    pub taxes: Decimal,
    /// Revenue minus costs and taxes.
    pub profit: Decimal,
}

/// The consolidated budget of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedBudget {
    /// Monthly team cost.
    pub team_cost: Decimal,
    /// Monthly infrastructure costs.
    pub infrastructure_cost: Decimal,
    /// Monthly non-infrastructure additional costs.
    pub other_costs: Decimal,
    /// Non-infrastructure additional costs by category.
    pub other_costs_by_category: BTreeMap<String, Decimal>,
    /// Team plus all additional costs.
    pub total_monthly_cost: Decimal,
    /// Monthly taxes.
    pub monthly_taxes: Decimal,
    /// Monthly price.
    pub monthly_price: Decimal,
    /// Monthly price minus costs and taxes.
    pub monthly_profit: Decimal,
    /// Monthly profit over price, in percent.
    pub margin_percent: Decimal,
    /// Contract duration in months.
    pub contract_months: u32,
    /// Revenue over the whole contract.
    pub contract_revenue: Decimal,
    /// Costs over the whole contract.
    pub contract_costs: Decimal,
    /// Taxes over the whole contract.
    pub contract_taxes: Decimal,
    /// Profit over the whole contract.
    pub contract_profit: Decimal,
    /// Month-by-month view.
    pub monthly: Vec<MonthlyBudget>,
    /// Year-by-year view with inflation applied to costs.
    pub yearly: Vec<YearlyProjection>,
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * Decimal::ONE_HUNDRED
    }
}

/// Builds the consolidated budget.
///
/// A contract of zero months yields monthly figures with empty monthly and
/// yearly views and zero contract totals. The yearly projection stops at the
/// first year whose inflated costs no longer fit in a `Decimal`.
///
/// # Arguments
///
/// * `inputs` - Project, team cost, other costs, taxes, price and market
///   variables for one month of the contract
///
/// # Returns
///
/// The consolidated budget with its monthly and yearly views
pub fn build_budget(inputs: &BudgetInputs<'_>) -> ConsolidatedBudget {
    let mut infrastructure_cost = Decimal::ZERO;
    let mut other_costs_by_category: BTreeMap<String, Decimal> = BTreeMap::new();
    for cost in inputs.other_costs {
        if cost.is_infrastructure() {
            infrastructure_cost += cost.value;
        } else {
            *other_costs_by_category
                .entry(cost.category.clone())
                .or_default() += cost.value;
        }
    }
    let other_costs: Decimal = other_costs_by_category.values().sum();

    let total_monthly_cost = inputs.team_monthly_cost + infrastructure_cost + other_costs;
    let monthly_taxes = inputs.taxes.total_taxes;
    let monthly_price = inputs.margin.total_price;
    let monthly_profit = monthly_price - total_monthly_cost - monthly_taxes;
    let margin_percent = percent_of(monthly_profit, monthly_price);

    let months = inputs.project.contract_months;
    let span = Decimal::from(months);

    let monthly = (0..months)
        .map(|i| MonthlyBudget {
            month: i + 1,
            month_start: inputs
                .project
                .start_date
                .and_then(|start| start.checked_add_months(Months::new(i))),
            revenue: monthly_price,
            costs: total_monthly_cost,
            taxes: monthly_taxes,
            profit: monthly_profit,
            margin_percent,
        })
        .collect();

    let inflation = Decimal::ONE + inputs.market.inflation_rate / Decimal::ONE_HUNDRED;
    let mut readjustment = Decimal::ONE;
    let mut yearly = Vec::new();
    let mut remaining = months;
    let mut year = 1;
    while remaining > 0 {
        let in_year = remaining.min(MONTHS_PER_YEAR);
        let n = Decimal::from(in_year);
        let revenue = monthly_price * n;
        let taxes = monthly_taxes * n;
        let projected = total_monthly_cost
            .checked_mul(readjustment)
            .and_then(|c| c.checked_mul(n))
            .and_then(|costs| Some((costs, revenue.checked_sub(costs)?.checked_sub(taxes)?)));
        let Some((costs, profit)) = projected else {
            debug!(
                year,
                inflation = %inputs.market.inflation_rate,
                "Yearly projection overflowed, stopping"
            );
            break;
        };
        yearly.push(YearlyProjection {
            year,
            months: in_year,
            revenue,
            costs,
            taxes,
            profit,
        });
        remaining -= in_year;
        year += 1;
        match readjustment.checked_mul(inflation) {
            Some(next) => readjustment = next,
            None => {
                debug!(
                    year,
                    inflation = %inputs.market.inflation_rate,
                    "Inflation readjustment overflowed, stopping"
                );
                break;
            }
        }
    }

    ConsolidatedBudget {
        team_cost: inputs.team_monthly_cost,
        infrastructure_cost,
        other_costs,
        other_costs_by_category,
        total_monthly_cost,
        monthly_taxes,
        monthly_price,
        monthly_profit,
        margin_percent,
        contract_months: months,
        contract_revenue: monthly_price * span,
        contract_costs: total_monthly_cost * span,
        contract_taxes: monthly_taxes * span,
        contract_profit: monthly_profit * span,
        monthly,
        yearly,
    }
}

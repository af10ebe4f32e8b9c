//! What-if scenario evaluation.
//!
//! A scenario is an ordered list of percentage adjustments applied to a copy
//! of the baseline snapshot, after which team cost, taxes and price are
//! recomputed. Scenarios are independent and evaluated on the rayon pool.

use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::ProjectSnapshot;

use super::financial::{RoiResult, calculate_roi};
use super::margin::{MarginResult, calculate_margin};
use super::tax::{TaxBreakdown, calculate_taxes, taxable_revenue};
use super::team_cost::{TeamCostBreakdown, calculate_team_cost};

/// Share of the monthly price standing in for the scenario investment.
pub const SCENARIO_INVESTMENT_SHARE: Decimal = dec!(0.30);

/// Share of the monthly price standing in for each period's scenario return.
pub const SCENARIO_RETURN_SHARE: Decimal = dec!(0.15);

/// Number of return periods in the scenario ROI.
pub const SCENARIO_RETURN_MONTHS: usize = 12;

/// Which part of the snapshot an adjustment scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentCategory {
    /// Every member's base salary.
    Salary,
    /// Every additional cost value.
    Costs,
    /// The projected monthly revenue.
    Revenue,
    /// Every standard and custom tax rate.
    Taxes,
}

/// A percentage change to one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// What to scale.
    pub category: AdjustmentCategory,
    /// Change in percent; -10 scales by 0.9.
    pub percent: Decimal,
}

impl Adjustment {
    fn factor(&self) -> Decimal {
        Decimal::ONE + self.percent / Decimal::ONE_HUNDRED
    }
}

/// A named set of adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Adjustments, applied in order.
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

/// The recomputed figures for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Id of the scenario this result belongs to.
    pub scenario_id: String,
    /// Scenario name.
    pub name: String,
    /// Team cost under the scenario.
    pub team_cost: TeamCostBreakdown,
    /// Taxes under the scenario.
    pub taxes: TaxBreakdown,
    /// Price under the scenario.
    pub margin: MarginResult,
    /// Monthly price minus cost base minus taxes.
    pub monthly_net_result: Decimal,
    /// Heuristic ROI for ranking scenarios against each other.
    pub roi: RoiResult,
}

/// How a scenario differs from the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    /// Scenario id.
    pub scenario_id: String,
    /// Price change against the baseline.
    pub price_delta: Decimal,
    /// Monthly net result change against the baseline.
    pub net_result_delta: Decimal,
    /// ROI change in percentage points.
    pub roi_delta: Decimal,
}

/// Baseline and scenarios side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// The unadjusted snapshot.
    pub baseline: ScenarioResult,
    /// Scenario results, in input order.
    pub scenarios: Vec<ScenarioResult>,
    /// Differences against the baseline, in input order.
    pub deltas: Vec<ScenarioDelta>,
    /// The scenario with the highest ROI, then the highest monthly net
    /// result; the first one wins remaining ties.
    pub best_scenario_id: Option<String>,
}

/// Scales the fields of `snapshot` selected by the adjustment.
pub fn apply_adjustment(snapshot: &mut ProjectSnapshot, adjustment: &Adjustment) {
    let factor = adjustment.factor();
    match adjustment.category {
        AdjustmentCategory::Salary => {
            for member in &mut snapshot.team {
                member.salary *= factor;
            }
        }
        AdjustmentCategory::Costs => {
            for cost in &mut snapshot.other_costs {
                cost.value *= factor;
            }
        }
        AdjustmentCategory::Revenue => {
            snapshot.project.projected_monthly_revenue *= factor;
        }
        AdjustmentCategory::Taxes => {
            let taxes = &mut snapshot.taxes;
            for rate in [
                &mut taxes.icms,
                &mut taxes.pis,
                &mut taxes.cofins,
                &mut taxes.iss,
                &mut taxes.ir,
                &mut taxes.csll,
            ] {
                *rate *= factor;
            }
            for custom in &mut taxes.custom {
                custom.rate *= factor;
            }
        }
    }
}

/// Returns a copy of the baseline with the scenario's adjustments applied.
pub fn adjusted_snapshot(baseline: &ProjectSnapshot, scenario: &Scenario) -> ProjectSnapshot {
    let mut snapshot = baseline.clone();
    for adjustment in &scenario.adjustments {
        apply_adjustment(&mut snapshot, adjustment);
    }
    snapshot
}

fn evaluate(snapshot: &ProjectSnapshot, id: &str, name: &str) -> EngineResult<ScenarioResult> {
    let team_cost = calculate_team_cost(&snapshot.team, &snapshot.schedules);
    let margin = calculate_margin(
        team_cost.total_monthly_cost,
        &snapshot.margin,
        &snapshot.other_costs,
    )?;
    let taxes = calculate_taxes(
        taxable_revenue(&snapshot.project, margin.total_price),
        &snapshot.taxes,
    );

    let monthly_net_result = margin.total_price - margin.cost_base - taxes.total_taxes;
    let investment = margin.total_price * SCENARIO_INVESTMENT_SHARE;
    let monthly_return = margin.total_price * SCENARIO_RETURN_SHARE;
    let roi = calculate_roi(investment, &vec![monthly_return; SCENARIO_RETURN_MONTHS]);

    Ok(ScenarioResult {
        scenario_id: id.to_string(),
        name: name.to_string(),
        team_cost,
        taxes,
        margin,
        monthly_net_result,
        roi,
    })
}

/// Evaluates one scenario against the baseline.
///
/// The ROI is an approximation for comparing scenarios with each other:
/// 30% of the monthly price stands in for the investment and 15% of it for
/// each of twelve monthly returns. It is not a recomputation of the
/// project's investment analysis.
pub fn evaluate_scenario(
    baseline: &ProjectSnapshot,
    scenario: &Scenario,
) -> EngineResult<ScenarioResult> {
    evaluate(
        &adjusted_snapshot(baseline, scenario),
        &scenario.id,
        &scenario.name,
    )
}

/// Evaluates every scenario in parallel, returning results in input order.
///
/// # Arguments
///
/// * `baseline` - The unadjusted snapshot; never modified
/// * `scenarios` - Scenarios to evaluate independently
///
/// # Returns
///
/// Returns one `ScenarioResult` per scenario, tagged with its id.
///
/// # Errors
///
/// Fails if any scenario's margin configuration is invalid.
pub fn run_scenarios(
    baseline: &ProjectSnapshot,
    scenarios: &[Scenario],
) -> EngineResult<Vec<ScenarioResult>> {
    scenarios
        .par_iter()
        .map(|scenario| evaluate_scenario(baseline, scenario))
        .collect()
}

/// Evaluates the baseline and every scenario and compares them.
pub fn compare_scenarios(
    baseline: &ProjectSnapshot,
    scenarios: &[Scenario],
) -> EngineResult<ScenarioComparison> {
    let base = evaluate(baseline, "baseline", "Baseline")?;
    let results = run_scenarios(baseline, scenarios)?;

    let deltas = results
        .iter()
        .map(|r| ScenarioDelta {
            scenario_id: r.scenario_id.clone(),
            price_delta: r.margin.total_price - base.margin.total_price,
            net_result_delta: r.monthly_net_result - base.monthly_net_result,
            roi_delta: r.roi.roi_percent - base.roi.roi_percent,
        })
        .collect();

    let mut best: Option<&ScenarioResult> = None;
    for result in &results {
        let better = best.is_none_or(|b| {
            (result.roi.roi_percent, result.monthly_net_result)
                > (b.roi.roi_percent, b.monthly_net_result)
        });
        if better {
            best = Some(result);
        }
    }
    let best_scenario_id = best.map(|r| r.scenario_id.clone());

    Ok(ScenarioComparison {
        baseline: base,
        scenarios: results,
        deltas,
        best_scenario_id,
    })
}

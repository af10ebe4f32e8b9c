//! Calculation logic for the pricing engine.
//!
//! Each module implements one pure, synchronous component of the pipeline:
//! team cost, weekly coverage, taxes, margin, investment analysis, what-if
//! scenarios and the consolidated budget. None of them perform I/O or touch
//! the cache; caching is layered on by [`crate::engine::Engine`].

mod budget;
mod coverage;
mod financial;
mod margin;
mod scenario;
mod tax;
mod team_cost;

pub use budget::{BudgetInputs, ConsolidatedBudget, MonthlyBudget, YearlyProjection, build_budget};
pub use coverage::{
    CoverageAnalysis, CoverageGap, CoverageMatrix, GapSeverity, HOURS_PER_WEEK, analyze_coverage,
    build_coverage_matrix, classify_gap, day_name, detect_gaps,
};
pub use financial::{
    CashFlowEntry, DEFAULT_DISCOUNT_RATE, IRR_INITIAL_GUESS, IRR_MAX_ITERATIONS, IRR_TOLERANCE,
    InvestmentAnalysis, IrrResult, PAYBACK_DISCOUNT_RATE, PaybackResult, RoiResult,
    analyze_investment, calculate_payback, calculate_roi, internal_rate_of_return,
    net_present_value,
};
pub use margin::{MarginPosition, MarginResult, calculate_margin, validate_margin};
pub use scenario::{
    Adjustment, AdjustmentCategory, SCENARIO_INVESTMENT_SHARE, SCENARIO_RETURN_MONTHS,
    SCENARIO_RETURN_SHARE, Scenario, ScenarioComparison, ScenarioDelta, ScenarioResult,
    adjusted_snapshot, apply_adjustment, compare_scenarios, evaluate_scenario, run_scenarios,
};
pub use tax::{PROFIT_PROXY_SHARE, TaxBreakdown, TaxLine, calculate_taxes, taxable_revenue};
pub use team_cost::{
    BenefitsBreakdown, DEFAULT_FGTS_PERCENT, MemberCost, RoleCost, TeamCostBreakdown,
    WEEKS_PER_MONTH, calculate_benefits, calculate_member_cost, calculate_team_cost,
    shift_multiplier,
};

//! The calculation pipeline.
//!
//! [`Engine`] owns the cache regions and exposes every calculation, caching
//! team cost, tax and investment results. [`Engine::calculate`] runs the
//! whole pipeline over one snapshot and records an audit trace.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{CacheKey, EngineCaches};
use crate::calculation::{
    BudgetInputs, ConsolidatedBudget, CoverageAnalysis, GapSeverity, InvestmentAnalysis,
    MarginPosition, MarginResult, Scenario, ScenarioComparison, ScenarioResult, TaxBreakdown,
    TeamCostBreakdown, analyze_coverage, analyze_investment, build_budget, calculate_margin,
    calculate_taxes, calculate_team_cost, compare_scenarios, run_scenarios, taxable_revenue,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AdditionalCost, AuditStep, AuditTrace, AuditWarning, MarginConfig, ProjectCalculation,
    ProjectSnapshot, TaxConfig, TeamMember, WarningSeverity, WorkSchedule,
};

/// Warning code: achieved margin below the configured minimum.
pub const WARN_MARGIN_BELOW_MINIMUM: &str = "MARGIN_BELOW_MINIMUM";
/// Warning code: achieved margin above the configured maximum.
pub const WARN_MARGIN_ABOVE_MAXIMUM: &str = "MARGIN_ABOVE_MAXIMUM";
/// Warning code: price does not cover costs and taxes.
pub const WARN_NEGATIVE_NET_RESULT: &str = "NEGATIVE_NET_RESULT";
/// Warning code: the IRR iteration did not converge.
pub const WARN_IRR_NOT_CONVERGED: &str = "IRR_NOT_CONVERGED";
/// Warning code: business-hour gaps longer than four hours.
pub const WARN_CRITICAL_COVERAGE_GAPS: &str = "CRITICAL_COVERAGE_GAPS";
/// Warning code: covered hours staffed below the minimum.
pub const WARN_UNDERSTAFFED_HOURS: &str = "UNDERSTAFFED_HOURS";

/// The pricing engine.
///
/// Cheap to share: wrap it in an [`Arc`] or clone the cache handle into
/// another engine with [`Engine::with_caches`].
///
/// # Example
///
/// ```
/// use desk_pricing_engine::config::EngineConfig;
/// use desk_pricing_engine::engine::Engine;
/// use desk_pricing_engine::models::TaxConfig;
/// use rust_decimal::Decimal;
///
/// let engine = Engine::new(EngineConfig::default());
/// let config = TaxConfig { iss: Decimal::new(5, 0), ..TaxConfig::default() };
/// let taxes = engine.taxes(Decimal::new(1000, 0), &config).unwrap();
/// assert_eq!(taxes.total_taxes, Decimal::new(50, 0));
/// assert_eq!(engine.caches().tax.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    caches: Arc<EngineCaches>,
}

impl Engine {
    /// Creates an engine with fresh caches sized by `config`.
    pub fn new(config: EngineConfig) -> Self {
        let caches = Arc::new(EngineCaches::new(&config.cache));
        Self { config, caches }
    }

    /// Creates an engine over existing caches.
    pub fn with_caches(config: EngineConfig, caches: Arc<EngineCaches>) -> Self {
        Self { config, caches }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The cache regions.
    pub fn caches(&self) -> &Arc<EngineCaches> {
        &self.caches
    }

    /// Team cost, cached on the team and schedules.
    pub fn team_cost(
        &self,
        team: &[TeamMember],
        schedules: &[WorkSchedule],
    ) -> EngineResult<TeamCostBreakdown> {
        self.cached_team_cost(team, schedules, calculate_team_cost)
    }

    fn cached_team_cost<F>(
        &self,
        team: &[TeamMember],
        schedules: &[WorkSchedule],
        compute: F,
    ) -> EngineResult<TeamCostBreakdown>
    where
        F: FnOnce(&[TeamMember], &[WorkSchedule]) -> TeamCostBreakdown,
    {
        let key = CacheKey::new("teamCost", &(team, schedules))?;
        Ok(self
            .caches
            .team_cost
            .get_or_insert_with(key, || compute(team, schedules)))
    }

    /// Weekly coverage analysis. Not cached.
    pub fn coverage(&self, schedules: &[WorkSchedule]) -> CoverageAnalysis {
        analyze_coverage(schedules)
    }

    /// Tax breakdown, cached on revenue and tax configuration.
    pub fn taxes(&self, revenue: Decimal, config: &TaxConfig) -> EngineResult<TaxBreakdown> {
        let key = CacheKey::new("taxes", &(revenue, config))?;
        Ok(self
            .caches
            .tax
            .get_or_insert_with(key, || calculate_taxes(revenue, config)))
    }

    /// Sale price for a cost base. Not cached.
    pub fn margin(
        &self,
        cost: Decimal,
        config: &MarginConfig,
        additional_costs: &[AdditionalCost],
    ) -> EngineResult<MarginResult> {
        calculate_margin(cost, config, additional_costs)
    }

    /// Investment analysis, cached on investment, returns and rate.
    ///
    /// Uses the configured default discount rate when `discount_rate` is
    /// `None`.
    pub fn investment(
        &self,
        investment: Decimal,
        returns: &[Decimal],
        discount_rate: Option<Decimal>,
    ) -> EngineResult<InvestmentAnalysis> {
        let rate = discount_rate.unwrap_or(self.config.financial.default_discount_rate);
        if rate <= Decimal::NEGATIVE_ONE {
            return Err(EngineError::InvalidInput {
                field: "discount_rate".to_string(),
                message: format!("{} must be greater than -1", rate),
            });
        }

        let key = CacheKey::new("investmentAnalysis", &(investment, returns, rate))?;
        Ok(self
            .caches
            .roi
            .get_or_insert_with(key, || analyze_investment(investment, returns, rate)))
    }

    /// Evaluates scenarios against a baseline, in input order.
    pub fn scenarios(
        &self,
        baseline: &ProjectSnapshot,
        scenarios: &[Scenario],
    ) -> EngineResult<Vec<ScenarioResult>> {
        run_scenarios(baseline, scenarios)
    }

    /// Evaluates scenarios and compares them with the baseline.
    pub fn compare(
        &self,
        baseline: &ProjectSnapshot,
        scenarios: &[Scenario],
    ) -> EngineResult<ScenarioComparison> {
        compare_scenarios(baseline, scenarios)
    }

    /// Consolidated budget of a snapshot.
    pub fn budget(&self, snapshot: &ProjectSnapshot) -> EngineResult<ConsolidatedBudget> {
        snapshot.project.validate()?;
        let priced = self.price(snapshot)?;
        Ok(build_budget(&BudgetInputs {
            project: &snapshot.project,
            team_monthly_cost: priced.team_cost.total_monthly_cost,
            other_costs: &snapshot.other_costs,
            taxes: &priced.taxes,
            margin: &priced.margin,
            market: &snapshot.market,
        }))
    }

    fn price(&self, snapshot: &ProjectSnapshot) -> EngineResult<Priced> {
        let team_cost = self.team_cost(&snapshot.team, &snapshot.schedules)?;
        let margin = self.margin(
            team_cost.total_monthly_cost,
            &snapshot.margin,
            &snapshot.other_costs,
        )?;
        let taxes = self.taxes(
            taxable_revenue(&snapshot.project, margin.total_price),
            &snapshot.taxes,
        )?;
        Ok(Priced {
            team_cost,
            margin,
            taxes,
        })
    }

    /// Runs the full pipeline over one snapshot.
    ///
    /// The investment analysis treats the project's initial investment as
    /// the outlay and the monthly net result (price minus costs and taxes)
    /// over the contract as the return series, discounted at the snapshot's
    /// market discount rate.
    pub fn calculate(&self, snapshot: &ProjectSnapshot) -> EngineResult<ProjectCalculation> {
        let start_time = Instant::now();
        let calculation_id = Uuid::new_v4();
        let mut trace = TraceBuilder::default();
        snapshot.project.validate()?;

        let Priced {
            team_cost,
            margin,
            taxes,
        } = self.price(snapshot)?;

        trace.step(
            "team_cost",
            "Team Cost",
            json!({
                "members": snapshot.team.len(),
                "schedules": snapshot.schedules.len(),
            }),
            json!({
                "total_monthly_cost": team_cost.total_monthly_cost,
                "total_monthly_hours": team_cost.total_monthly_hours,
                "cost_per_hour": team_cost.cost_per_hour,
            }),
            format!(
                "{} member(s) across {} role(s) cost {} per month",
                team_cost.members.len(),
                team_cost.by_role.len(),
                team_cost.total_monthly_cost
            ),
        );

        let coverage = self.coverage(&snapshot.schedules);
        trace.step(
            "coverage",
            "Coverage Analysis",
            json!({ "schedules": snapshot.schedules.len() }),
            json!({
                "covered_hours": coverage.covered_hours,
                "coverage_percentage": coverage.coverage_percentage,
                "gaps": coverage.gaps.len(),
            }),
            format!(
                "{} of 168 weekly hours covered with {} gap(s)",
                coverage.covered_hours,
                coverage.gaps.len()
            ),
        );
        let critical_gaps = coverage
            .gaps
            .iter()
            .filter(|g| g.severity == GapSeverity::Critical)
            .count();
        if critical_gaps > 0 {
            trace.warn(
                WARN_CRITICAL_COVERAGE_GAPS,
                format!(
                    "{} business-hour gap(s) longer than four hours",
                    critical_gaps
                ),
                WarningSeverity::Medium,
            );
        }
        if coverage.understaffed_hours > 0 {
            trace.warn(
                WARN_UNDERSTAFFED_HOURS,
                format!(
                    "{} covered hour(s) staffed below the minimum of {}",
                    coverage.understaffed_hours, coverage.minimum_staff
                ),
                WarningSeverity::Medium,
            );
        }

        trace.step(
            "margin",
            "Margin",
            json!({
                "cost": team_cost.total_monthly_cost,
                "margin_type": snapshot.margin.margin_type,
                "value": snapshot.margin.value,
                "additional_costs": snapshot.other_costs.len(),
            }),
            json!({
                "cost_base": margin.cost_base,
                "total_price": margin.total_price,
                "gross_margin_percent": margin.gross_margin_percent,
            }),
            format!(
                "Price {} over a cost base of {}",
                margin.total_price, margin.cost_base
            ),
        );
        match margin.position {
            MarginPosition::BelowMinimum => trace.warn(
                WARN_MARGIN_BELOW_MINIMUM,
                format!(
                    "Gross margin of {}% is below the configured minimum",
                    margin.gross_margin_percent.round_dp(2)
                ),
                WarningSeverity::Medium,
            ),
            MarginPosition::AboveMaximum => trace.warn(
                WARN_MARGIN_ABOVE_MAXIMUM,
                format!(
                    "Gross margin of {}% is above the configured maximum",
                    margin.gross_margin_percent.round_dp(2)
                ),
                WarningSeverity::Low,
            ),
            MarginPosition::WithinBounds => {}
        }

        trace.step(
            "taxes",
            "Taxes",
            json!({ "revenue": taxes.revenue }),
            json!({
                "total_taxes": taxes.total_taxes,
                "effective_rate": taxes.effective_rate,
            }),
            format!(
                "Effective tax rate of {}%",
                taxes.effective_rate.round_dp(2)
            ),
        );

        let monthly_net = margin.total_price - margin.cost_base - taxes.total_taxes;
        if monthly_net < Decimal::ZERO {
            trace.warn(
                WARN_NEGATIVE_NET_RESULT,
                format!("Monthly net result of {} is negative", monthly_net.round_dp(2)),
                WarningSeverity::High,
            );
        }

        let months = snapshot.project.contract_months as usize;
        let returns = vec![monthly_net; months];
        let investment = self.investment(
            snapshot.project.initial_investment,
            &returns,
            Some(snapshot.market.discount_rate),
        )?;
        trace.step(
            "investment",
            "Investment Analysis",
            json!({
                "investment": snapshot.project.initial_investment,
                "monthly_return": monthly_net,
                "periods": months,
                "discount_rate": investment.discount_rate,
            }),
            json!({
                "roi_percent": investment.roi.roi_percent,
                "npv": investment.npv,
                "irr_percent": investment.irr.rate_percent,
                "simple_payback_period": investment.payback.simple_payback_period,
            }),
            format!(
                "ROI of {}% with simple payback in period {}",
                investment.roi.roi_percent.round_dp(2),
                investment.payback.simple_payback_period
            ),
        );
        if snapshot.project.initial_investment > Decimal::ZERO
            && months > 0
            && !investment.irr.converged
        {
            warn!(
                calculation_id = %calculation_id,
                iterations = investment.irr.iterations,
                "IRR did not converge"
            );
            trace.warn(
                WARN_IRR_NOT_CONVERGED,
                format!(
                    "IRR did not converge after {} iteration(s); last estimate {}%",
                    investment.irr.iterations,
                    investment.irr.rate_percent.round_dp(2)
                ),
                WarningSeverity::Low,
            );
        }

        let budget = build_budget(&BudgetInputs {
            project: &snapshot.project,
            team_monthly_cost: team_cost.total_monthly_cost,
            other_costs: &snapshot.other_costs,
            taxes: &taxes,
            margin: &margin,
            market: &snapshot.market,
        });
        trace.step(
            "budget",
            "Budget",
            json!({ "contract_months": snapshot.project.contract_months }),
            json!({
                "contract_revenue": budget.contract_revenue,
                "contract_profit": budget.contract_profit,
                "margin_percent": budget.margin_percent,
            }),
            format!(
                "Contract profit of {} over {} month(s)",
                budget.contract_profit, budget.contract_months
            ),
        );

        let duration_us = start_time.elapsed().as_micros() as u64;
        let audit_trace = trace.finish(duration_us);

        info!(
            calculation_id = %calculation_id,
            project = %snapshot.project.name,
            monthly_price = %margin.total_price,
            warnings = audit_trace.warnings.len(),
            duration_us,
            "Pipeline calculation completed"
        );

        Ok(ProjectCalculation {
            calculation_id,
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            project_name: snapshot.project.name.clone(),
            team_cost,
            coverage,
            margin,
            taxes,
            investment,
            budget,
            audit_trace,
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

struct Priced {
    team_cost: TeamCostBreakdown,
    margin: MarginResult,
    taxes: TaxBreakdown,
}

#[derive(Default)]
struct TraceBuilder {
    steps: Vec<AuditStep>,
    warnings: Vec<AuditWarning>,
}

impl TraceBuilder {
    fn step(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        self.steps.push(AuditStep {
            step_number: self.steps.len() as u32 + 1,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }

    fn warn(&mut self, code: &str, message: String, severity: WarningSeverity) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message,
            severity,
        });
    }

    fn finish(self, duration_us: u64) -> AuditTrace {
        AuditTrace {
            steps: self.steps,
            warnings: self.warnings,
            duration_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{Adjustment, AdjustmentCategory, calculate_member_cost};
    use std::cell::Cell;
    use crate::models::{
        Benefits, CostFrequency, CoverageRequirement, MarginType, MarketVariables, ProjectInfo,
        Shift,
    };
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;

    fn member(id: &str, salary: Decimal) -> TeamMember {
        TeamMember {
            id: id.to_string(),
            name: id.to_uppercase(),
            role: "analyst".to_string(),
            salary,
            benefits: Benefits {
                fgts_percent: Some(Decimal::ZERO),
                ..Benefits::default()
            },
            workload_hours: dec!(40),
            skills: vec![],
            certifications: vec![],
        }
    }

    fn business_hours(minimum_staff: u32) -> WorkSchedule {
        WorkSchedule {
            id: "sched".to_string(),
            name: "Business hours".to_string(),
            shifts: vec![Shift {
                id: "day".to_string(),
                name: "Day".to_string(),
                start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                days: vec![1, 2, 3, 4, 5],
                assigned_members: vec!["m1".to_string(), "m2".to_string()],
                is_special: false,
                multiplier: Decimal::ONE,
            }],
            special_rates: vec![],
            coverage: CoverageRequirement {
                minimum_staff,
                preferred_staff: minimum_staff,
            },
        }
    }

    fn snapshot() -> ProjectSnapshot {
        ProjectSnapshot {
            project: ProjectInfo {
                name: "Helpdesk".to_string(),
                contract_months: 12,
                start_date: None,
                projected_monthly_revenue: Decimal::ZERO,
                initial_investment: dec!(10000),
            },
            team: vec![member("m1", dec!(4000)), member("m2", dec!(4000))],
            schedules: vec![business_hours(1)],
            taxes: TaxConfig {
                iss: dec!(5),
                ..TaxConfig::default()
            },
            market: MarketVariables::default(),
            other_costs: vec![AdditionalCost {
                category: "infrastructure".to_string(),
                description: "Ticketing".to_string(),
                value: dec!(2000),
                frequency: CostFrequency::Monthly,
            }],
            margin: MarginConfig {
                margin_type: MarginType::Percentage,
                value: dec!(20),
                minimum: None,
                target: None,
                maximum: None,
            },
        }
    }

    #[test]
    fn test_pipeline_figures() {
        let engine = Engine::default();
        let result = engine.calculate(&snapshot()).unwrap();

        assert_eq!(result.project_name, "Helpdesk");
        assert_eq!(result.team_cost.total_monthly_cost, dec!(8000));
        assert_eq!(result.margin.cost_base, dec!(10000));
        assert_eq!(result.margin.total_price, dec!(12500));
        // No projection, so taxes fall on the price
        assert_eq!(result.taxes.revenue, dec!(12500));
        assert_eq!(result.taxes.total_taxes, dec!(625));
        // 1875 net per month over 12 months against 10000
        assert_eq!(result.investment.roi.total_returns, dec!(22500));
        assert_eq!(result.investment.payback.simple_payback_period, 6);
        assert_eq!(result.budget.monthly.len(), 12);
        assert_eq!(result.budget.monthly_profit, dec!(1875));
        assert_eq!(result.coverage.covered_hours, 45);
    }

    #[test]
    fn test_audit_trace_records_every_step() {
        let result = Engine::default().calculate(&snapshot()).unwrap();
        let ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["team_cost", "coverage", "margin", "taxes", "investment", "budget"]
        );
        for (i, step) in result.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
        assert!(result.audit_trace.has_warning(WARN_CRITICAL_COVERAGE_GAPS));
        assert!(!result.audit_trace.has_warning(WARN_NEGATIVE_NET_RESULT));
    }

    #[test]
    fn test_warnings_for_bounds_staffing_and_losses() {
        let mut snap = snapshot();
        snap.schedules = vec![business_hours(3)];
        snap.margin.minimum = Some(dec!(25));
        snap.taxes.iss = dec!(30);

        let result = Engine::default().calculate(&snap).unwrap();
        let trace = &result.audit_trace;

        assert!(trace.has_warning(WARN_MARGIN_BELOW_MINIMUM));
        assert!(trace.has_warning(WARN_UNDERSTAFFED_HOURS));
        assert!(trace.has_warning(WARN_NEGATIVE_NET_RESULT));
    }

    #[test]
    fn test_invalid_margin_fails_the_pipeline() {
        let mut snap = snapshot();
        snap.margin.value = dec!(100);
        let err = Engine::default().calculate(&snap).unwrap_err();
        assert!(matches!(err, EngineError::InvalidMargin { .. }));
    }

    #[test]
    fn test_oversized_contract_is_rejected_before_projection() {
        let engine = Engine::default();
        let mut snap = snapshot();
        snap.project.contract_months = u32::MAX;

        let err = engine.calculate(&snap).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
        let err = engine.budget(&snap).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
        assert!(engine.caches().roi.is_empty());
    }

    #[test]
    fn test_repeated_team_cost_is_served_from_cache() {
        let engine = Engine::default();
        let snap = snapshot();

        let first = engine.team_cost(&snap.team, &snap.schedules).unwrap();
        let second = engine.team_cost(&snap.team, &snap.schedules).unwrap();

        assert_eq!(first, second);
        let stats = engine.caches().team_cost.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_repeated_team_cost_computes_each_member_once() {
        let engine = Engine::default();
        let snap = snapshot();
        let member_computations = Cell::new(0);
        let counted = |team: &[TeamMember], schedules: &[WorkSchedule]| {
            for member in team {
                member_computations.set(member_computations.get() + 1);
                calculate_member_cost(member, schedules);
            }
            calculate_team_cost(team, schedules)
        };

        let first = engine
            .cached_team_cost(&snap.team, &snap.schedules, counted)
            .unwrap();
        assert_eq!(member_computations.get(), 2);

        let second = engine
            .cached_team_cost(&snap.team, &snap.schedules, counted)
            .unwrap();
        let third = engine.team_cost(&snap.team, &snap.schedules).unwrap();

        assert_eq!(member_computations.get(), 2);
        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn test_changed_team_misses_the_cache() {
        let engine = Engine::default();
        let mut snap = snapshot();
        engine.team_cost(&snap.team, &snap.schedules).unwrap();
        snap.team[0].salary = dec!(5000);
        let cost = engine.team_cost(&snap.team, &snap.schedules).unwrap();

        assert_eq!(cost.total_monthly_cost, dec!(9000));
        assert_eq!(engine.caches().team_cost.stats().misses, 2);
    }

    #[test]
    fn test_engines_can_share_caches() {
        let first = Engine::default();
        let second = Engine::with_caches(EngineConfig::default(), first.caches().clone());
        let snap = snapshot();

        first.team_cost(&snap.team, &snap.schedules).unwrap();
        second.team_cost(&snap.team, &snap.schedules).unwrap();

        assert_eq!(second.caches().team_cost.stats().hits, 1);
    }

    #[test]
    fn test_investment_uses_default_rate() {
        let mut config = EngineConfig::default();
        config.financial.default_discount_rate = dec!(0.05);
        let engine = Engine::new(config);

        let analysis = engine
            .investment(dec!(100), &[dec!(105)], None)
            .unwrap();
        assert_eq!(analysis.discount_rate, dec!(0.05));
        assert_eq!(analysis.npv, Decimal::ZERO);
    }

    #[test]
    fn test_investment_rejects_rate_of_minus_one() {
        let err = Engine::default()
            .investment(dec!(100), &[dec!(105)], Some(dec!(-1)))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_budget_matches_pipeline_budget() {
        let engine = Engine::default();
        let snap = snapshot();
        let budget = engine.budget(&snap).unwrap();
        let result = engine.calculate(&snap).unwrap();
        assert_eq!(budget, result.budget);
    }

    #[test]
    fn test_compare_through_engine() {
        let engine = Engine::default();
        let scenarios = vec![Scenario {
            id: "raise".to_string(),
            name: "Raise".to_string(),
            adjustments: vec![Adjustment {
                category: AdjustmentCategory::Salary,
                percent: dec!(10),
            }],
        }];
        let comparison = engine.compare(&snapshot(), &scenarios).unwrap();
        assert_eq!(comparison.scenarios.len(), 1);
        assert!(comparison.deltas[0].price_delta > Decimal::ZERO);
    }
}

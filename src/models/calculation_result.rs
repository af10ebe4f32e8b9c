//! Result models for a full pipeline run.
//!
//! [`ProjectCalculation`] bundles every component's output for one snapshot
//! together with an [`AuditTrace`] of the steps taken.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{
    ConsolidatedBudget, CoverageAnalysis, InvestmentAnalysis, MarginResult, TaxBreakdown,
    TeamCostBreakdown,
};

/// How serious an audit warning is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational.
    Low,
    /// Worth reviewing.
    Medium,
    /// Likely to make the proposal unviable.
    High,
}

/// A single step in the audit trace.
///
/// Each step captures the input, output, and reasoning for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// Identifier of the component that ran.
    pub rule_id: String,
    /// Human-readable name of the component.
    pub rule_name: String,
    /// Summary of the step's input.
    pub input: serde_json::Value,
    /// Summary of the step's output.
    pub output: serde_json::Value,
    /// Human-readable explanation of the result.
    pub reasoning: String,
}

/// A warning raised during a pipeline run.
///
/// Warnings never stop the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: WarningSeverity,
}

/// The complete audit trace for a pipeline run.
///
/// # Example
///
/// ```
/// use desk_pricing_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// assert!(trace.warnings.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Returns whether a warning with `code` was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

/// Every output of one pipeline run over a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// Project name from the snapshot.
    pub project_name: String,
    /// Team cost breakdown.
    pub team_cost: TeamCostBreakdown,
    /// Weekly coverage analysis.
    pub coverage: CoverageAnalysis,
    /// Sale price.
    pub margin: MarginResult,
    /// Monthly taxes.
    pub taxes: TaxBreakdown,
    /// ROI, NPV, IRR and payback over the contract.
    pub investment: InvestmentAnalysis,
    /// Consolidated budget.
    pub budget: ConsolidatedBudget,
    /// Complete audit trace of the run.
    pub audit_trace: AuditTrace,
}

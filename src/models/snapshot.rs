//! The input snapshot handed to the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{AdditionalCost, MarginConfig, MarketVariables, TaxConfig, TeamMember, WorkSchedule};

/// Longest contract the engine will price, in months.
pub const MAX_CONTRACT_MONTHS: u32 = 600;

/// Contract-level figures for the project being priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project name.
    #[serde(default)]
    pub name: String,
    /// Contract duration in months.
    pub contract_months: u32,
    /// First month of the contract, if known.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Expected monthly revenue. When zero, the margin-derived price is used.
    #[serde(default)]
    pub projected_monthly_revenue: Decimal,
    /// Up-front investment needed to stand the desk up.
    #[serde(default)]
    pub initial_investment: Decimal,
}

impl ProjectInfo {
    /// Rejects contract lengths the engine will not project.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] when `contract_months` exceeds
    /// [`MAX_CONTRACT_MONTHS`].
    pub fn validate(&self) -> EngineResult<()> {
        if self.contract_months > MAX_CONTRACT_MONTHS {
            return Err(EngineError::InvalidInput {
                field: "project.contract_months".to_string(),
                message: format!(
                    "contract of {} months exceeds the maximum of {}",
                    self.contract_months, MAX_CONTRACT_MONTHS
                ),
            });
        }
        Ok(())
    }
}

/// Everything the engine needs for one pricing run.
///
/// The snapshot is a plain value: `clone()` yields an independent structural
/// copy, which is what scenario evaluation adjusts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Contract-level figures.
    pub project: ProjectInfo,
    /// Staff on the desk.
    #[serde(default)]
    pub team: Vec<TeamMember>,
    /// Work schedules.
    #[serde(default)]
    pub schedules: Vec<WorkSchedule>,
    /// Tax rates.
    #[serde(default)]
    pub taxes: TaxConfig,
    /// Market variables.
    #[serde(default)]
    pub market: MarketVariables,
    /// Non-staff costs.
    #[serde(default)]
    pub other_costs: Vec<AdditionalCost>,
    /// Margin policy.
    pub margin: MarginConfig,
}

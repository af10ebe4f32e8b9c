//! Core data models for the pricing engine.
//!
//! Input models describe one project snapshot: the team, its schedules, the
//! tax and margin policy, additional costs and market variables. Result
//! models carry the output of a full pipeline run.

mod calculation_result;
mod finance;
mod schedule;
mod snapshot;
mod team;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, ProjectCalculation, WarningSeverity,
};
pub use finance::{
    AdditionalCost, CostFrequency, CustomTax, MarginConfig, MarginType, MarketVariables, TaxBase,
    TaxConfig, sum_costs,
};
pub use schedule::{CoverageRequirement, Shift, SpecialRate, WorkSchedule};
pub use snapshot::{MAX_CONTRACT_MONTHS, ProjectInfo, ProjectSnapshot};
pub use team::{BenefitKind, Benefits, CustomBenefit, TeamMember};

//! Team member model and benefit package types.
//!
//! Team members are supplied by the staffing collaborator and consumed
//! read-only by the cost calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a custom benefit is valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitKind {
    /// A fixed monthly amount.
    Fixed,
    /// A percentage of the member's base salary.
    Percentage,
}

/// A benefit outside the standard allowance set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomBenefit {
    /// Display name of the benefit.
    pub name: String,
    /// Whether `value` is an amount or a percentage.
    pub kind: BenefitKind,
    /// The amount, or the percentage of base salary.
    pub value: Decimal,
}

/// The benefit package attached to a team member.
///
/// Fixed allowances are monthly amounts. Percentage allowances are applied to
/// the member's *base* salary, never to the shift-adjusted salary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Benefits {
    /// Health insurance allowance.
    pub health_insurance: Decimal,
    /// Meal allowance.
    pub meal_allowance: Decimal,
    /// Transport allowance.
    pub transport_allowance: Decimal,
    /// Life insurance allowance.
    pub life_insurance: Decimal,
    /// Vacation provision, percent of base salary.
    pub vacation_percent: Decimal,
    /// 13th salary provision, percent of base salary.
    pub thirteenth_salary_percent: Decimal,
    /// FGTS contribution, percent of base salary. Defaults to 8% when unset.
    pub fgts_percent: Option<Decimal>,
    /// INSS contribution, percent of base salary.
    pub inss_percent: Decimal,
    /// Any further benefits.
    pub custom: Vec<CustomBenefit>,
}

/// A member of the service desk team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique identifier, referenced by shift assignments.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Role or position (e.g. "analyst_n1").
    #[serde(default)]
    pub role: String,
    /// Monthly base salary.
    pub salary: Decimal,
    /// Benefit package.
    #[serde(default)]
    pub benefits: Benefits,
    /// Contracted weekly hours.
    pub workload_hours: Decimal,
    /// Skills, descriptive only.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Certifications, descriptive only.
    #[serde(default)]
    pub certifications: Vec<String>,
}

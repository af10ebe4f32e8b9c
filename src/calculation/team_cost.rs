//! Team cost calculation.
//!
//! Computes the monthly cost of every team member (shift-adjusted salary plus
//! benefits) and aggregates it into team totals.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{BenefitKind, TeamMember, WorkSchedule};

/// Average number of weeks in a month, used to turn weekly hours into monthly hours.
pub const WEEKS_PER_MONTH: Decimal = dec!(4.33);

/// FGTS contribution applied when a member's package leaves it unset.
pub const DEFAULT_FGTS_PERCENT: Decimal = dec!(8);

/// Role label used for members without one.
const UNASSIGNED_ROLE: &str = "unassigned";

/// Benefit amounts for one member, grouped by how they are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitsBreakdown {
    /// Health, meal, transport and life insurance allowances.
    pub fixed_allowances: Decimal,
    /// Vacation, 13th salary, FGTS and INSS provisions.
    pub percentage_allowances: Decimal,
    /// Custom benefits.
    pub custom: Decimal,
    /// Sum of all benefits.
    pub total: Decimal,
}

/// The monthly cost of one team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCost {
    /// The member's id.
    pub member_id: String,
    /// The member's role.
    pub role: String,
    /// Salary before shift multipliers.
    pub base_salary: Decimal,
    /// Highest multiplier from the shifts the member works.
    pub multiplier: Decimal,
    /// Base salary times multiplier.
    pub adjusted_salary: Decimal,
    /// Benefits, computed on the base salary.
    pub benefits: BenefitsBreakdown,
    /// Adjusted salary plus benefits.
    pub total_cost: Decimal,
    /// Weekly workload converted to monthly hours.
    pub monthly_hours: Decimal,
    /// Total cost per monthly hour, zero without workload.
    pub hourly_rate: Decimal,
}

/// Aggregated cost for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCost {
    /// The role.
    pub role: String,
    /// Number of members in the role.
    pub members: usize,
    /// Summed monthly cost of those members.
    pub total_cost: Decimal,
}

/// Cost breakdown for the whole team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCostBreakdown {
    /// Per-member costs, in team order.
    pub members: Vec<MemberCost>,
    /// Costs grouped by role, sorted by role name.
    pub by_role: Vec<RoleCost>,
    /// Sum of member costs.
    pub total_monthly_cost: Decimal,
    /// Monthly cost times twelve.
    pub total_annual_cost: Decimal,
    /// Sum of member monthly hours.
    pub total_monthly_hours: Decimal,
    /// Monthly cost per monthly hour across the team.
    pub cost_per_hour: Decimal,
}

impl TeamCostBreakdown {
    /// An all-zero breakdown.
    pub fn empty() -> Self {
        Self {
            members: Vec::new(),
            by_role: Vec::new(),
            total_monthly_cost: Decimal::ZERO,
            total_annual_cost: Decimal::ZERO,
            total_monthly_hours: Decimal::ZERO,
            cost_per_hour: Decimal::ZERO,
        }
    }
}

/// Finds the highest pay multiplier that applies to a member.
///
/// Every shift the member is assigned to contributes its own multiplier and
/// the multipliers of the special rates that apply to it. Returns 1 when the
/// member works no shift.
pub fn shift_multiplier(member_id: &str, schedules: &[WorkSchedule]) -> Decimal {
    let mut multiplier: Option<Decimal> = None;

    for schedule in schedules {
        for shift in schedule.shifts.iter().filter(|s| s.is_assigned(member_id)) {
            let special = schedule
                .special_rates
                .iter()
                .filter(|r| r.applies_to(&shift.id))
                .map(|r| r.multiplier);

            for candidate in std::iter::once(shift.multiplier).chain(special) {
                multiplier = Some(multiplier.map_or(candidate, |m| m.max(candidate)));
            }
        }
    }

    multiplier.unwrap_or(Decimal::ONE)
}

/// Computes the benefits of a member from their base salary.
pub fn calculate_benefits(member: &TeamMember) -> BenefitsBreakdown {
    let benefits = &member.benefits;
    let salary = member.salary;

    let fixed_allowances = benefits.health_insurance
        + benefits.meal_allowance
        + benefits.transport_allowance
        + benefits.life_insurance;

    let percent = benefits.vacation_percent
        + benefits.thirteenth_salary_percent
        + benefits.fgts_percent.unwrap_or(DEFAULT_FGTS_PERCENT)
        + benefits.inss_percent;
    let percentage_allowances = salary * percent / Decimal::ONE_HUNDRED;

    let custom: Decimal = benefits
        .custom
        .iter()
        .map(|b| match b.kind {
            BenefitKind::Fixed => b.value,
            BenefitKind::Percentage => salary * b.value / Decimal::ONE_HUNDRED,
        })
        .sum();

    BenefitsBreakdown {
        fixed_allowances,
        percentage_allowances,
        custom,
        total: fixed_allowances + percentage_allowances + custom,
    }
}

/// Computes the monthly cost of a single member.
///
/// The highest applicable shift multiplier raises the salary; benefits are
/// always computed on the base salary.
///
/// # Arguments
///
/// * `member` - The team member to cost
/// * `schedules` - Schedules whose shifts and special rates may apply to the member
///
/// # Returns
///
/// Returns a `MemberCost` with the adjusted salary, benefits, total and hourly rate.
///
/// # Examples
///
/// ```
/// use desk_pricing_engine::calculation::calculate_member_cost;
/// use desk_pricing_engine::models::{Benefits, TeamMember};
/// use rust_decimal::Decimal;
///
/// let member = TeamMember {
///     id: "m1".to_string(),
///     name: "Ana".to_string(),
///     role: "analyst".to_string(),
///     salary: Decimal::new(3000, 0),
///     benefits: Benefits::default(),
///     workload_hours: Decimal::new(40, 0),
///     skills: vec![],
///     certifications: vec![],
/// };
///
/// let cost = calculate_member_cost(&member, &[]);
/// // 3000 salary + 8% default FGTS
/// assert_eq!(cost.total_cost, Decimal::new(3240, 0));
/// ```
pub fn calculate_member_cost(member: &TeamMember, schedules: &[WorkSchedule]) -> MemberCost {
    let multiplier = shift_multiplier(&member.id, schedules);
    let adjusted_salary = member.salary * multiplier;
    let benefits = calculate_benefits(member);
    let total_cost = adjusted_salary + benefits.total;

    let monthly_hours = member.workload_hours * WEEKS_PER_MONTH;
    let hourly_rate = if monthly_hours.is_zero() {
        Decimal::ZERO
    } else {
        total_cost / monthly_hours
    };

    let role = if member.role.is_empty() {
        UNASSIGNED_ROLE.to_string()
    } else {
        member.role.clone()
    };

    MemberCost {
        member_id: member.id.clone(),
        role,
        base_salary: member.salary,
        multiplier,
        adjusted_salary,
        benefits,
        total_cost,
        monthly_hours,
        hourly_rate,
    }
}

/// Computes the monthly and annual cost of a team.
///
/// An empty team yields [`TeamCostBreakdown::empty`].
///
/// # Arguments
///
/// * `team` - The members to cost
/// * `schedules` - Schedules supplying shift multipliers
///
/// # Returns
///
/// Returns a `TeamCostBreakdown` with per-member and per-role costs, the
/// monthly and annual totals and the blended cost per hour.
pub fn calculate_team_cost(team: &[TeamMember], schedules: &[WorkSchedule]) -> TeamCostBreakdown {
    if team.is_empty() {
        return TeamCostBreakdown::empty();
    }

    let members: Vec<MemberCost> = team
        .iter()
        .map(|m| calculate_member_cost(m, schedules))
        .collect();

    let total_monthly_cost: Decimal = members.iter().map(|m| m.total_cost).sum();
    let total_monthly_hours: Decimal = members.iter().map(|m| m.monthly_hours).sum();
    let cost_per_hour = if total_monthly_hours.is_zero() {
        Decimal::ZERO
    } else {
        total_monthly_cost / total_monthly_hours
    };

    let mut roles: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();
    for member in &members {
        let entry = roles.entry(member.role.as_str()).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += member.total_cost;
    }
    let by_role = roles
        .into_iter()
        .map(|(role, (count, total))| RoleCost {
            role: role.to_string(),
            members: count,
            total_cost: total,
        })
        .collect();

    TeamCostBreakdown {
        members,
        by_role,
        total_monthly_cost,
        total_annual_cost: total_monthly_cost * Decimal::from(12),
        total_monthly_hours,
        cost_per_hour,
    }
}

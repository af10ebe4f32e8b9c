//! Work schedule, shift and special rate models.
//!
//! Weekdays are numbered 0 (Sunday) through 6 (Saturday). Shift times are
//! times of day; a shift whose end hour is not after its start hour runs
//! overnight into the following day.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_multiplier() -> Decimal {
    Decimal::ONE
}

fn default_minimum_staff() -> u32 {
    1
}

/// A recurring shift within a work schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier, referenced by special rates.
    pub id: String,
    /// Display name (e.g. "Night").
    #[serde(default)]
    pub name: String,
    /// Time of day the shift starts.
    pub start_time: NaiveTime,
    /// Time of day the shift ends.
    pub end_time: NaiveTime,
    /// Weekdays the shift runs on, 0 = Sunday.
    pub days: Vec<u8>,
    /// Ids of the team members assigned to this shift.
    #[serde(default)]
    pub assigned_members: Vec<String>,
    /// Whether this is a special (night, weekend, on-call) shift.
    #[serde(default)]
    pub is_special: bool,
    /// Cost multiplier applied to the pay of assigned members.
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,
}

impl Shift {
    /// The hour of day the shift starts.
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// The hour of day the shift ends.
    pub fn end_hour(&self) -> u32 {
        self.end_time.hour()
    }

    /// Returns true if the shift wraps past midnight.
    ///
    /// Only whole hours are compared, so a shift whose end hour is not after
    /// its start hour counts as overnight. This includes shifts shorter than
    /// an hour inside a single hour (08:00-08:30), which therefore cover a
    /// full 24 hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use desk_pricing_engine::models::Shift;
    /// use chrono::NaiveTime;
    /// use rust_decimal::Decimal;
    ///
    /// let shift = Shift {
    ///     id: "night".to_string(),
    ///     name: "Night".to_string(),
    ///     start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
    ///     days: vec![1, 2, 3, 4, 5],
    ///     assigned_members: vec![],
    ///     is_special: true,
    ///     multiplier: Decimal::new(12, 1),
    /// };
    /// assert!(shift.is_overnight());
    /// assert_eq!(shift.duration_hours(), 8);
    /// ```
    pub fn is_overnight(&self) -> bool {
        self.end_hour() <= self.start_hour()
    }

    /// Whole hours covered by one occurrence of the shift.
    pub fn duration_hours(&self) -> u32 {
        if self.is_overnight() {
            24 - self.start_hour() + self.end_hour()
        } else {
            self.end_hour() - self.start_hour()
        }
    }

    /// Returns true if the given member is assigned to this shift.
    pub fn is_assigned(&self, member_id: &str) -> bool {
        self.assigned_members.iter().any(|id| id == member_id)
    }
}

/// A named rate rule that raises the multiplier of specific shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialRate {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// The condition the rate represents (e.g. "holiday", "on_call").
    #[serde(default)]
    pub condition: String,
    /// Multiplier applied to members working the applicable shifts.
    pub multiplier: Decimal,
    /// Ids of the shifts this rate applies to.
    #[serde(default)]
    pub applicable_shifts: Vec<String>,
}

impl SpecialRate {
    /// Returns true if this rate applies to the given shift.
    pub fn applies_to(&self, shift_id: &str) -> bool {
        self.applicable_shifts.iter().any(|id| id == shift_id)
    }
}

/// Staffing level a schedule is expected to provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRequirement {
    /// Minimum simultaneous staff.
    #[serde(default = "default_minimum_staff")]
    pub minimum_staff: u32,
    /// Preferred simultaneous staff.
    #[serde(default = "default_minimum_staff")]
    pub preferred_staff: u32,
}

impl Default for CoverageRequirement {
    fn default() -> Self {
        Self {
            minimum_staff: 1,
            preferred_staff: 1,
        }
    }
}

/// A named collection of shifts with its rate rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSchedule {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Shifts making up the schedule.
    #[serde(default)]
    pub shifts: Vec<Shift>,
    /// Special rate rules.
    #[serde(default)]
    pub special_rates: Vec<SpecialRate>,
    /// Required staffing level.
    #[serde(default)]
    pub coverage: CoverageRequirement,
}

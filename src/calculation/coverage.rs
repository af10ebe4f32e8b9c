//! Weekly coverage analysis.
//!
//! Projects every shift onto a 7 × 24 matrix (weekday × hour, weekday 0 is
//! Sunday), then reports the covered share of the week, the uncovered runs
//! ("gaps") with a severity, and staffing recommendations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::WorkSchedule;

/// Hours in a week.
pub const HOURS_PER_WEEK: u32 = 7 * 24;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const WEEKEND_DAYS: [usize; 2] = [0, 6];

/// Night hours run from 22:00 to 06:00.
const NIGHT_START: u32 = 22;
const NIGHT_END: u32 = 6;
const BUSINESS_START: u32 = 8;
const BUSINESS_END: u32 = 18;
const EVENING_END: u32 = 22;

/// Returns the display name of a weekday index (0 = Sunday).
pub fn day_name(day: u8) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("Unknown")
}

fn is_night_hour(hour: u32) -> bool {
    hour >= NIGHT_START || hour < NIGHT_END
}

/// How badly an uncovered run hurts the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSeverity {
    /// Minor gap, usually outside demand peaks.
    Low,
    /// Noticeable gap in evening or night hours.
    Medium,
    /// Short gap during business hours.
    High,
    /// Long gap during business hours.
    Critical,
}

impl std::fmt::Display for GapSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GapSeverity::Low => write!(f, "low"),
            GapSeverity::Medium => write!(f, "medium"),
            GapSeverity::High => write!(f, "high"),
            GapSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Classifies a gap by the period it starts in and its length.
///
/// - business hours (08–18): critical above 4h, otherwise high
/// - evening (18–22): medium above 2h, otherwise low
/// - night (22–06): medium above 6h, otherwise low
/// - early morning (06–08): low
pub fn classify_gap(start_hour: u32, duration_hours: u32) -> GapSeverity {
    if (BUSINESS_START..BUSINESS_END).contains(&start_hour) {
        if duration_hours > 4 {
            GapSeverity::Critical
        } else {
            GapSeverity::High
        }
    } else if (BUSINESS_END..EVENING_END).contains(&start_hour) {
        if duration_hours > 2 {
            GapSeverity::Medium
        } else {
            GapSeverity::Low
        }
    } else if is_night_hour(start_hour) {
        if duration_hours > 6 {
            GapSeverity::Medium
        } else {
            GapSeverity::Low
        }
    } else {
        GapSeverity::Low
    }
}

/// A contiguous run of hours with nobody scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    /// First uncovered hour.
    pub start_hour: u32,
    /// Hour the run ends at (exclusive); 24 when it reaches midnight.
    pub end_hour: u32,
    /// Weekdays the run occurs on.
    pub days: Vec<u8>,
    /// Severity of the gap.
    pub severity: GapSeverity,
    /// Suggested action.
    pub suggestion: String,
}

impl CoverageGap {
    /// Length of the gap in hours.
    pub fn duration_hours(&self) -> u32 {
        self.end_hour - self.start_hour
    }
}

/// Hour-by-hour view of a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageMatrix {
    /// Whether any shift covers the slot.
    pub covered: [[bool; 24]; 7],
    /// Number of members assigned to shifts covering the slot.
    pub staff: [[u32; 24]; 7],
}

impl CoverageMatrix {
    fn new() -> Self {
        Self {
            covered: [[false; 24]; 7],
            staff: [[0; 24]; 7],
        }
    }

    fn mark(&mut self, day: usize, from: u32, to: u32, staff: u32) {
        for hour in from..to {
            self.covered[day][hour as usize] = true;
            self.staff[day][hour as usize] += staff;
        }
    }

    /// Number of covered slots.
    pub fn covered_hours(&self) -> u32 {
        self.covered
            .iter()
            .flatten()
            .filter(|covered| **covered)
            .count() as u32
    }

    /// Covered hours per weekday.
    pub fn daily_covered_hours(&self) -> [u32; 7] {
        let mut daily = [0; 7];
        for (day, row) in self.covered.iter().enumerate() {
            daily[day] = row.iter().filter(|covered| **covered).count() as u32;
        }
        daily
    }
}

/// Marks every shift of every schedule on a weekly matrix.
///
/// An overnight shift (end hour not after start hour) covers from its start
/// to midnight on its own day, and from midnight to its end on the next day,
/// wrapping Saturday into Sunday. Weekday indexes above 6 are skipped.
pub fn build_coverage_matrix(schedules: &[WorkSchedule]) -> CoverageMatrix {
    let mut matrix = CoverageMatrix::new();

    for shift in schedules.iter().flat_map(|s| s.shifts.iter()) {
        let start = shift.start_hour();
        let end = shift.end_hour();
        let staff = shift.assigned_members.len() as u32;

        for &day in &shift.days {
            if day > 6 {
                debug!(shift_id = %shift.id, day, "Skipping weekday outside 0-6");
                continue;
            }
            let day = day as usize;
            if shift.is_overnight() {
                matrix.mark(day, start, 24, staff);
                matrix.mark((day + 1) % 7, 0, end, staff);
            } else {
                matrix.mark(day, start, end, staff);
            }
        }
    }

    matrix
}

fn gap_suggestion(day: u8, start: u32, end: u32, severity: GapSeverity) -> String {
    let window = format!("{} {:02}:00-{:02}:00", day_name(day), start, end);
    match severity {
        GapSeverity::Critical => format!(
            "Add a shift covering {} - long gap during business hours",
            window
        ),
        GapSeverity::High => format!("Extend an adjacent shift to cover {}", window),
        GapSeverity::Medium => format!("Consider on-call or reduced staffing for {}", window),
        GapSeverity::Low => format!("Low-demand window {} can stay uncovered", window),
    }
}

/// Finds every uncovered run, day by day.
///
/// Runs never cross midnight: a run reaching hour 24 is closed on its day and
/// the next day starts a new one. The result is a pure function of the matrix.
pub fn detect_gaps(matrix: &CoverageMatrix) -> Vec<CoverageGap> {
    let mut gaps = Vec::new();

    for (day, row) in matrix.covered.iter().enumerate() {
        let day = day as u8;
        let mut run_start: Option<u32> = None;

        for (hour, covered) in row.iter().enumerate() {
            let hour = hour as u32;
            match (*covered, run_start) {
                (false, None) => run_start = Some(hour),
                (true, Some(start)) => {
                    gaps.push(make_gap(day, start, hour));
                    run_start = None;
                }
                _ => {}
            }
        }

        if let Some(start) = run_start {
            gaps.push(make_gap(day, start, 24));
        }
    }

    gaps
}

fn make_gap(day: u8, start: u32, end: u32) -> CoverageGap {
    let severity = classify_gap(start, end - start);
    CoverageGap {
        start_hour: start,
        end_hour: end,
        days: vec![day],
        severity,
        suggestion: gap_suggestion(day, start, end, severity),
    }
}

/// The outcome of a coverage analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageAnalysis {
    /// The weekly matrix.
    pub matrix: CoverageMatrix,
    /// Covered slots out of 168.
    pub covered_hours: u32,
    /// Covered share of the week, 0 to 100.
    pub coverage_percentage: Decimal,
    /// Covered hours per weekday, Sunday first.
    pub daily_covered_hours: [u32; 7],
    /// Covered share of Saturday and Sunday, 0 to 100.
    pub weekend_coverage: Decimal,
    /// Covered share of night hours (22–06), 0 to 100.
    pub night_coverage: Decimal,
    /// Strictest minimum staff requirement across the schedules.
    pub minimum_staff: u32,
    /// Covered slots staffed below `minimum_staff`.
    pub understaffed_hours: u32,
    /// Uncovered runs.
    pub gaps: Vec<CoverageGap>,
    /// Human-readable recommendations.
    pub recommendations: Vec<String>,
}

fn percentage(part: u32, whole: u32) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole)).min(Decimal::ONE_HUNDRED)
}

fn overall_recommendation(coverage: Decimal) -> &'static str {
    if coverage < Decimal::from(30) {
        "Coverage is too low for a service desk; add shifts to cover core business hours"
    } else if coverage < Decimal::from(60) {
        "Coverage is partial; expand service hours to reduce uncovered periods"
    } else if coverage < Decimal::from(80) {
        "Coverage is good; optimize shift distribution to close the remaining gaps"
    } else {
        "Coverage is adequate for the service requirements"
    }
}

/// Analyzes the weekly coverage provided by a set of schedules.
///
/// With no schedules the result is 0% coverage, no gaps and a single
/// recommendation to configure a schedule.
///
/// # Arguments
///
/// * `schedules` - Every schedule whose shifts contribute to coverage
///
/// # Returns
///
/// Returns a `CoverageAnalysis` with the weekly matrix, coverage ratios,
/// understaffed hours, classified gaps and recommendations.
///
/// # Examples
///
/// ```
/// use desk_pricing_engine::calculation::analyze_coverage;
/// use rust_decimal::Decimal;
///
/// let analysis = analyze_coverage(&[]);
/// assert_eq!(analysis.coverage_percentage, Decimal::ZERO);
/// assert_eq!(analysis.recommendations.len(), 1);
/// ```
pub fn analyze_coverage(schedules: &[WorkSchedule]) -> CoverageAnalysis {
    let matrix = build_coverage_matrix(schedules);

    if schedules.is_empty() {
        return CoverageAnalysis {
            daily_covered_hours: [0; 7],
            matrix,
            covered_hours: 0,
            coverage_percentage: Decimal::ZERO,
            weekend_coverage: Decimal::ZERO,
            night_coverage: Decimal::ZERO,
            minimum_staff: 0,
            understaffed_hours: 0,
            gaps: Vec::new(),
            recommendations: vec![
                "Configure at least one work schedule to analyze coverage".to_string(),
            ],
        };
    }

    let covered_hours = matrix.covered_hours();
    let coverage_percentage = percentage(covered_hours, HOURS_PER_WEEK);

    let weekend_hours: u32 = WEEKEND_DAYS
        .iter()
        .map(|&day| matrix.covered[day].iter().filter(|c| **c).count() as u32)
        .sum();
    let weekend_coverage = percentage(weekend_hours, 48);

    let night_hours = matrix
        .covered
        .iter()
        .flat_map(|row| row.iter().enumerate())
        .filter(|(hour, covered)| **covered && is_night_hour(*hour as u32))
        .count() as u32;
    let night_coverage = percentage(night_hours, 7 * (24 - NIGHT_START + NIGHT_END));

    let minimum_staff = schedules
        .iter()
        .map(|s| s.coverage.minimum_staff)
        .max()
        .unwrap_or(0);
    let understaffed_hours = matrix
        .covered
        .iter()
        .flatten()
        .zip(matrix.staff.iter().flatten())
        .filter(|(covered, staff)| **covered && **staff < minimum_staff)
        .count() as u32;

    let gaps = detect_gaps(&matrix);

    let mut recommendations = vec![overall_recommendation(coverage_percentage).to_string()];
    if weekend_coverage < Decimal::from(50) {
        recommendations.push(
            "Weekend coverage is limited; consider weekend shifts or an on-call rota".to_string(),
        );
    }
    if night_coverage < Decimal::from(50) {
        recommendations.push(
            "Night coverage is limited; consider a night shift or remote on-call support"
                .to_string(),
        );
    }
    let critical = gaps
        .iter()
        .filter(|g| g.severity == GapSeverity::Critical)
        .count();
    if critical > 0 {
        recommendations.push(format!(
            "{} critical gap(s) during business hours need immediate attention",
            critical
        ));
    }
    if understaffed_hours > 0 {
        recommendations.push(format!(
            "{} covered hour(s) fall below the minimum staff of {}",
            understaffed_hours, minimum_staff
        ));
    }

    CoverageAnalysis {
        daily_covered_hours: matrix.daily_covered_hours(),
        matrix,
        covered_hours,
        coverage_percentage,
        weekend_coverage,
        night_coverage,
        minimum_staff,
        understaffed_hours,
        gaps,
        recommendations,
    }
}

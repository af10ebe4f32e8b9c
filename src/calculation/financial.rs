//! Investment analysis: ROI, NPV, IRR and payback.
//!
//! A return series holds one amount per period; period `i` (0-based) is
//! discounted by `(1 + rate)^(i + 1)`. Rates are fractions (0.10 = 10%)
//! unless a field name says percent.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Discount rate used when the caller supplies none.
pub const DEFAULT_DISCOUNT_RATE: Decimal = dec!(0.10);

/// Fixed rate for the discounted payback walk.
pub const PAYBACK_DISCOUNT_RATE: Decimal = dec!(0.10);

/// Starting point of the IRR iteration.
pub const IRR_INITIAL_GUESS: Decimal = dec!(0.10);

/// |NPV| below which the IRR iteration stops.
pub const IRR_TOLERANCE: Decimal = dec!(0.0001);

/// Iteration cap for the IRR solver.
pub const IRR_MAX_ITERATIONS: u32 = 100;

const DERIVATIVE_FLOOR: Decimal = dec!(0.0000000001);
const MIN_RATE: Decimal = dec!(-0.99);
const MAX_RATE: Decimal = dec!(100);

/// Return on investment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiResult {
    /// Up-front investment.
    pub investment: Decimal,
    /// Sum of the return series.
    pub total_returns: Decimal,
    /// Returns minus investment.
    pub net_profit: Decimal,
    /// Net profit over investment, in percent.
    pub roi_percent: Decimal,
}

/// Outcome of the IRR iteration.
///
/// The solver is Newton-Raphson; when it stops early because the derivative
/// vanished, or runs out of iterations, `rate` is the last iterate and
/// `converged` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrResult {
    /// Rate as a fraction.
    pub rate: Decimal,
    /// Rate in percent.
    pub rate_percent: Decimal,
    /// Iterations performed.
    pub iterations: u32,
    /// Whether |NPV| fell below the tolerance.
    pub converged: bool,
}

/// One period of the cash flow ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    /// 1-based period number.
    pub period: u32,
    /// Return received in the period.
    pub cash_in: Decimal,
    /// Outflow; the investment, recorded in period 1 only.
    pub cash_out: Decimal,
    /// Cash in minus cash out.
    pub net_flow: Decimal,
    /// Running total of net flows.
    pub cumulative_flow: Decimal,
}

/// Payback periods and the ledger they were read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaybackResult {
    /// First period whose cumulative flow is non-negative; 0 if never.
    pub simple_payback_period: u32,
    /// Same walk with returns discounted at 10%; 0 if never.
    pub discounted_payback_period: u32,
    /// Period-by-period ledger.
    pub cash_flows: Vec<CashFlowEntry>,
}

/// The full set of investment figures for one return series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentAnalysis {
    /// Return on investment.
    pub roi: RoiResult,
    /// Rate used for the NPV.
    pub discount_rate: Decimal,
    /// Net present value at `discount_rate`.
    pub npv: Decimal,
    /// Internal rate of return.
    pub irr: IrrResult,
    /// Payback periods and ledger.
    pub payback: PaybackResult,
}

/// Computes the ROI of a return series.
///
/// An empty series or a zero investment yields a zero ROI.
///
/// # Arguments
///
/// * `investment` - Up-front outlay
/// * `returns` - Return per period
///
/// # Returns
///
/// Returns a `RoiResult` with total returns, net profit and ROI in percent.
///
/// # Examples
///
/// ```
/// use desk_pricing_engine::calculation::calculate_roi;
/// use rust_decimal::Decimal;
///
/// let returns = [30_000, 35_000, 40_000].map(Decimal::from);
/// let roi = calculate_roi(Decimal::from(100_000), &returns);
/// assert_eq!(roi.roi_percent, Decimal::from(5));
/// ```
pub fn calculate_roi(investment: Decimal, returns: &[Decimal]) -> RoiResult {
    if returns.is_empty() {
        return RoiResult {
            investment,
            total_returns: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            roi_percent: Decimal::ZERO,
        };
    }

    let total_returns: Decimal = returns.iter().sum();
    let net_profit = total_returns - investment;
    let roi_percent = if investment.is_zero() {
        Decimal::ZERO
    } else {
        net_profit / investment * Decimal::ONE_HUNDRED
    };

    RoiResult {
        investment,
        total_returns,
        net_profit,
        roi_percent,
    }
}

/// Yields `(period index, value / (1 + rate)^(index + 1))` for each return.
///
/// Once the discount factor overflows, the remaining terms are treated as zero.
fn discounted_returns(returns: &[Decimal], rate: Decimal) -> impl Iterator<Item = Decimal> + '_ {
    let base = Decimal::ONE + rate;
    let mut factor = Some(Decimal::ONE);
    returns.iter().map(move |value| {
        factor = factor.and_then(|f| f.checked_mul(base));
        factor
            .and_then(|f| value.checked_div(f))
            .unwrap_or(Decimal::ZERO)
    })
}

/// Net present value of a return series at `rate`.
pub fn net_present_value(investment: Decimal, returns: &[Decimal], rate: Decimal) -> Decimal {
    discounted_returns(returns, rate).fold(-investment, |npv, term| npv + term)
}

/// NPV and its derivative with respect to the rate.
fn npv_with_derivative(investment: Decimal, returns: &[Decimal], rate: Decimal) -> (Decimal, Decimal) {
    let base = Decimal::ONE + rate;
    let mut npv = -investment;
    let mut derivative = Decimal::ZERO;

    for (period, term) in discounted_returns(returns, rate).enumerate() {
        npv += term;
        // d/dr [R / (1+r)^n] = -n * R / (1+r)^(n+1)
        let weight = Decimal::from(period as u64 + 1);
        if let Some(slope) = term.checked_mul(weight).and_then(|t| t.checked_div(base)) {
            derivative -= slope;
        }
    }

    (npv, derivative)
}

/// Approximates the internal rate of return with Newton-Raphson.
///
/// Starts at 10% and stops once |NPV| < 1e-4 or after 100 iterations. When
/// the derivative underflows the iteration stops and the last rate is
/// returned unconverged; callers must not treat the result as an exact root.
pub fn internal_rate_of_return(investment: Decimal, returns: &[Decimal]) -> IrrResult {
    if returns.is_empty() {
        return IrrResult {
            rate: Decimal::ZERO,
            rate_percent: Decimal::ZERO,
            iterations: 0,
            converged: false,
        };
    }

    let result = |rate: Decimal, iterations: u32, converged: bool| IrrResult {
        rate,
        rate_percent: rate * Decimal::ONE_HUNDRED,
        iterations,
        converged,
    };

    let mut rate = IRR_INITIAL_GUESS;
    for iteration in 1..=IRR_MAX_ITERATIONS {
        let (npv, derivative) = npv_with_derivative(investment, returns, rate);

        if npv.abs() < IRR_TOLERANCE {
            return result(rate, iteration, true);
        }

        if derivative.abs() < DERIVATIVE_FLOOR {
            debug!(iteration, rate = %rate, "IRR derivative underflow, stopping early");
            return result(rate, iteration, false);
        }

        let step = npv.checked_div(derivative).unwrap_or(Decimal::ZERO);
        rate = (rate - step).clamp(MIN_RATE, MAX_RATE);
    }

    debug!(rate = %rate, "IRR did not converge");
    result(rate, IRR_MAX_ITERATIONS, false)
}

fn first_non_negative(investment: Decimal, flows: impl Iterator<Item = Decimal>) -> u32 {
    let mut cumulative = -investment;
    for (period, flow) in flows.enumerate() {
        cumulative += flow;
        if cumulative >= Decimal::ZERO {
            return period as u32 + 1;
        }
    }
    0
}

/// Computes simple and discounted payback periods and the cash flow ledger.
///
/// A period of 0 means the investment is never recovered within the series.
/// The discounted payback uses a fixed 10% rate.
///
/// # Arguments
///
/// * `investment` - Up-front outlay, booked as cash out in period 1
/// * `returns` - Return per period
///
/// # Returns
///
/// Returns a `PaybackResult` with both 1-based payback periods and one
/// ledger entry per period.
///
/// # Examples
///
/// ```
/// use desk_pricing_engine::calculation::calculate_payback;
/// use rust_decimal::Decimal;
///
/// let returns = [30_000, 40_000, 50_000, 60_000].map(Decimal::from);
/// let payback = calculate_payback(Decimal::from(100_000), &returns);
/// assert_eq!(payback.simple_payback_period, 3);
/// assert_eq!(payback.cash_flows.len(), 4);
/// ```
pub fn calculate_payback(investment: Decimal, returns: &[Decimal]) -> PaybackResult {
    let simple_payback_period = first_non_negative(investment, returns.iter().copied());
    let discounted_payback_period =
        first_non_negative(investment, discounted_returns(returns, PAYBACK_DISCOUNT_RATE));

    let mut cumulative_flow = Decimal::ZERO;
    let cash_flows = returns
        .iter()
        .enumerate()
        .map(|(index, &cash_in)| {
            let cash_out = if index == 0 { investment } else { Decimal::ZERO };
            let net_flow = cash_in - cash_out;
            cumulative_flow += net_flow;
            CashFlowEntry {
                period: index as u32 + 1,
                cash_in,
                cash_out,
                net_flow,
                cumulative_flow,
            }
        })
        .collect();

    PaybackResult {
        simple_payback_period,
        discounted_payback_period,
        cash_flows,
    }
}

/// Runs every investment calculation over one return series.
///
/// An empty series yields an all-zero analysis.
pub fn analyze_investment(
    investment: Decimal,
    returns: &[Decimal],
    discount_rate: Decimal,
) -> InvestmentAnalysis {
    let npv = if returns.is_empty() {
        Decimal::ZERO
    } else {
        net_present_value(investment, returns, discount_rate)
    };

    InvestmentAnalysis {
        roi: calculate_roi(investment, returns),
        discount_rate,
        npv,
        irr: internal_rate_of_return(investment, returns),
        payback: calculate_payback(investment, returns),
    }
}

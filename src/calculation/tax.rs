//! Tax breakdown calculation.
//!
//! Applies the standard Brazilian service taxes and any custom taxes to a
//! revenue figure and reports the effective rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{ProjectInfo, TaxBase, TaxConfig};

/// Share of revenue used as the profit estimate for profit-based custom taxes.
pub const PROFIT_PROXY_SHARE: Decimal = dec!(0.20);

const EFFECTIVE_RATE_HINT_THRESHOLD: Decimal = dec!(30);
const ISS_HINT_THRESHOLD: Decimal = dec!(5);
const IR_HINT_THRESHOLD: Decimal = dec!(15);

/// One tax in a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    /// Tax name.
    pub name: String,
    /// Rate in percent, or the amount for fixed taxes.
    pub rate: Decimal,
    /// The value the rate was applied to.
    pub base: Decimal,
    /// Tax due.
    pub amount: Decimal,
    /// Whether the tax came from the custom list.
    pub custom: bool,
}

/// Taxes due on a revenue figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// The revenue taxed.
    pub revenue: Decimal,
    /// Standard taxes first, then custom taxes in configuration order.
    pub lines: Vec<TaxLine>,
    /// Sum of all tax amounts.
    pub total_taxes: Decimal,
    /// Total taxes as a percentage of revenue; zero without revenue.
    pub effective_rate: Decimal,
    /// Threshold-triggered optimization hints.
    pub hints: Vec<String>,
}

impl TaxBreakdown {
    /// Returns the amount of the named tax, if present.
    pub fn amount_of(&self, name: &str) -> Option<Decimal> {
        self.lines.iter().find(|l| l.name == name).map(|l| l.amount)
    }
}

/// The revenue figure taxes are computed on.
///
/// Uses the project's projected monthly revenue, falling back to the
/// margin-derived price when no projection was supplied.
pub fn taxable_revenue(project: &ProjectInfo, price: Decimal) -> Decimal {
    if project.projected_monthly_revenue > Decimal::ZERO {
        project.projected_monthly_revenue
    } else {
        price
    }
}

/// Computes the taxes due on `revenue`.
///
/// Custom taxes are computed on revenue, on a profit estimate of 20% of
/// revenue, or are taken as a fixed amount, depending on their base.
///
/// # Arguments
///
/// * `revenue` - Monthly revenue the rates apply to
/// * `config` - Standard and custom tax rates
///
/// # Returns
///
/// Returns a `TaxBreakdown` with one line per tax, the total, the effective
/// rate and optimization hints.
///
/// # Examples
///
/// ```
/// use desk_pricing_engine::calculation::calculate_taxes;
/// use desk_pricing_engine::models::TaxConfig;
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig {
///     iss: Decimal::new(5, 0),
///     ..TaxConfig::default()
/// };
/// let taxes = calculate_taxes(Decimal::new(10_000, 0), &config);
/// assert_eq!(taxes.amount_of("ISS"), Some(Decimal::new(500, 0)));
/// assert_eq!(taxes.effective_rate, Decimal::new(5, 0));
/// ```
pub fn calculate_taxes(revenue: Decimal, config: &TaxConfig) -> TaxBreakdown {
    let mut lines: Vec<TaxLine> = config
        .standard_rates()
        .into_iter()
        .map(|(name, rate)| TaxLine {
            name: name.to_string(),
            rate,
            base: revenue,
            amount: revenue * rate / Decimal::ONE_HUNDRED,
            custom: false,
        })
        .collect();

    lines.extend(config.custom.iter().map(|tax| {
        let (base, amount) = match tax.base {
            TaxBase::Revenue => (revenue, revenue * tax.rate / Decimal::ONE_HUNDRED),
            TaxBase::Profit => {
                let profit = revenue * PROFIT_PROXY_SHARE;
                (profit, profit * tax.rate / Decimal::ONE_HUNDRED)
            }
            TaxBase::Fixed => (tax.rate, tax.rate),
        };
        TaxLine {
            name: tax.name.clone(),
            rate: tax.rate,
            base,
            amount,
            custom: true,
        }
    }));

    let total_taxes: Decimal = lines.iter().map(|l| l.amount).sum();
    let effective_rate = if revenue.is_zero() {
        Decimal::ZERO
    } else {
        total_taxes / revenue * Decimal::ONE_HUNDRED
    };

    TaxBreakdown {
        revenue,
        lines,
        total_taxes,
        effective_rate,
        hints: optimization_hints(effective_rate, config),
    }
}

fn optimization_hints(effective_rate: Decimal, config: &TaxConfig) -> Vec<String> {
    let mut hints = Vec::new();
    if effective_rate > EFFECTIVE_RATE_HINT_THRESHOLD {
        hints.push(format!(
            "Effective tax rate of {}% is above {}%; review the tax regime for this contract",
            effective_rate.round_dp(2),
            EFFECTIVE_RATE_HINT_THRESHOLD
        ));
    }
    if config.iss > ISS_HINT_THRESHOLD {
        hints.push(format!(
            "ISS of {}% exceeds the usual {}% ceiling; confirm the municipal rate",
            config.iss, ISS_HINT_THRESHOLD
        ));
    }
    if config.ir > IR_HINT_THRESHOLD {
        hints.push(format!(
            "IR of {}% is above the {}% base rate; check whether the surcharge applies",
            config.ir, IR_HINT_THRESHOLD
        ));
    }
    hints
}

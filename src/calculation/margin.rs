//! Sale price derivation from cost and margin policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AdditionalCost, MarginConfig, MarginType, sum_costs};

/// Where the achieved margin sits relative to the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginPosition {
    /// Below the configured minimum.
    BelowMinimum,
    /// Within bounds (or no bounds configured).
    WithinBounds,
    /// Above the configured maximum.
    AboveMaximum,
}

/// A derived sale price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginResult {
    /// Cost base including additional costs.
    pub cost_base: Decimal,
    /// Sale price.
    pub total_price: Decimal,
    /// Price minus cost.
    pub margin_value: Decimal,
    /// Margin over price, in percent.
    pub gross_margin_percent: Decimal,
    /// Margin over cost, in percent.
    pub markup_percent: Decimal,
    /// Position against the informational bounds.
    pub position: MarginPosition,
}

/// Rejects margin configurations that cannot produce a finite price.
///
/// A percentage margin of 100 or more would divide by zero or yield a
/// negative price.
pub fn validate_margin(config: &MarginConfig) -> EngineResult<()> {
    if config.margin_type == MarginType::Percentage && config.value >= Decimal::ONE_HUNDRED {
        return Err(EngineError::InvalidMargin {
            value: config.value,
            message: "percentage margin must be below 100".to_string(),
        });
    }
    Ok(())
}

/// Derives the sale price from a cost base and a margin policy.
///
/// Additional costs are added to the cost base first. A percentage margin
/// prices at `cost / (1 - value/100)`, a fixed margin at `cost + value`.
///
/// # Arguments
///
/// * `cost` - Monthly cost before additional costs
/// * `config` - The margin policy and its informational bounds
/// * `additional_costs` - Costs summed into the cost base
///
/// # Returns
///
/// Returns a `MarginResult` with the price, margin, markup and bounds position.
///
/// # Errors
///
/// Returns [`EngineError::InvalidMargin`] for a percentage margin ≥ 100.
///
/// # Examples
///
/// ```
/// use desk_pricing_engine::calculation::calculate_margin;
/// use desk_pricing_engine::models::{MarginConfig, MarginType};
/// use rust_decimal::Decimal;
///
/// let config = MarginConfig {
///     margin_type: MarginType::Fixed,
///     value: Decimal::new(500, 0),
///     minimum: None,
///     target: None,
///     maximum: None,
/// };
/// let result = calculate_margin(Decimal::new(1500, 0), &config, &[]).unwrap();
/// assert_eq!(result.total_price, Decimal::new(2000, 0));
/// assert_eq!(result.gross_margin_percent, Decimal::new(25, 0));
/// ```
pub fn calculate_margin(
    cost: Decimal,
    config: &MarginConfig,
    additional_costs: &[AdditionalCost],
) -> EngineResult<MarginResult> {
    validate_margin(config)?;

    let cost_base = cost + sum_costs(additional_costs);
    let total_price = match config.margin_type {
        MarginType::Percentage => {
            cost_base / (Decimal::ONE - config.value / Decimal::ONE_HUNDRED)
        }
        MarginType::Fixed => cost_base + config.value,
    };

    let margin_value = total_price - cost_base;
    let gross_margin_percent = if total_price.is_zero() {
        Decimal::ZERO
    } else {
        margin_value / total_price * Decimal::ONE_HUNDRED
    };
    let markup_percent = if cost_base.is_zero() {
        Decimal::ZERO
    } else {
        margin_value / cost_base * Decimal::ONE_HUNDRED
    };

    let position = match (config.minimum, config.maximum) {
        (Some(min), _) if gross_margin_percent < min => MarginPosition::BelowMinimum,
        (_, Some(max)) if gross_margin_percent > max => MarginPosition::AboveMaximum,
        _ => MarginPosition::WithinBounds,
    };

    Ok(MarginResult {
        cost_base,
        total_price,
        margin_value,
        gross_margin_percent,
        markup_percent,
        position,
    })
}

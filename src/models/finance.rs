//! Tax, margin, cost and market inputs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The base a custom tax is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    /// Gross revenue.
    Revenue,
    /// Estimated profit, approximated as a fixed share of revenue.
    Profit,
    /// A fixed amount; the tax `rate` holds the amount itself.
    Fixed,
}

/// A tax outside the standard set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTax {
    /// Display name.
    pub name: String,
    /// Percentage rate, or the amount for [`TaxBase::Fixed`].
    pub rate: Decimal,
    /// What the rate is applied to.
    pub base: TaxBase,
}

/// Standard and custom tax rates, all in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// ICMS rate.
    pub icms: Decimal,
    /// PIS rate.
    pub pis: Decimal,
    /// COFINS rate.
    pub cofins: Decimal,
    /// ISS rate.
    pub iss: Decimal,
    /// IR rate.
    pub ir: Decimal,
    /// CSLL rate.
    pub csll: Decimal,
    /// Additional taxes.
    pub custom: Vec<CustomTax>,
}

impl TaxConfig {
    /// The standard taxes as `(name, rate)` pairs, in reporting order.
    pub fn standard_rates(&self) -> [(&'static str, Decimal); 6] {
        [
            ("ICMS", self.icms),
            ("PIS", self.pis),
            ("COFINS", self.cofins),
            ("ISS", self.iss),
            ("IR", self.ir),
            ("CSLL", self.csll),
        ]
    }
}

/// How the margin value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginType {
    /// Margin as a percentage of the sale price.
    Percentage,
    /// A fixed amount added on top of cost.
    Fixed,
}

/// Margin policy for deriving the sale price.
///
/// The bounds are informational; the engine reports where the achieved
/// margin falls but never clamps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginConfig {
    /// Percentage or fixed margin.
    #[serde(rename = "type")]
    pub margin_type: MarginType,
    /// The margin value.
    pub value: Decimal,
    /// Lowest acceptable margin percent.
    #[serde(default)]
    pub minimum: Option<Decimal>,
    /// Target margin percent.
    #[serde(default)]
    pub target: Option<Decimal>,
    /// Highest acceptable margin percent.
    #[serde(default)]
    pub maximum: Option<Decimal>,
}

/// How often an additional cost is incurred. Descriptive only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFrequency {
    /// Every month.
    #[default]
    Monthly,
    /// Once a year.
    Annual,
    /// Once for the contract.
    OneTime,
}

/// A non-staff cost summed into "other costs".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalCost {
    /// Cost category (e.g. "infrastructure", "licenses").
    pub category: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Monetary value.
    pub value: Decimal,
    /// How often the cost occurs.
    #[serde(default)]
    pub frequency: CostFrequency,
}

impl AdditionalCost {
    /// Returns true for infrastructure costs, which budgets report separately.
    pub fn is_infrastructure(&self) -> bool {
        self.category.eq_ignore_ascii_case("infrastructure")
    }
}

/// Sum of the values of the given costs.
pub fn sum_costs(costs: &[AdditionalCost]) -> Decimal {
    costs.iter().map(|c| c.value).sum()
}

fn default_discount_rate() -> Decimal {
    dec!(0.10)
}

/// Macro-economic variables for the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketVariables {
    /// Discount rate per period, as a fraction.
    #[serde(default = "default_discount_rate")]
    pub discount_rate: Decimal,
    /// Annual inflation, in percent, used to readjust costs per contract year.
    #[serde(default)]
    pub inflation_rate: Decimal,
}

impl Default for MarketVariables {
    fn default() -> Self {
        Self {
            discount_rate: default_discount_rate(),
            inflation_rate: Decimal::ZERO,
        }
    }
}

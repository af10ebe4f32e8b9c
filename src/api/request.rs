//! Request types for the pricing engine API.
//!
//! `/budget` and `/calculate` take a [`ProjectSnapshot`] body directly; the
//! other endpoints take the structures below.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::Scenario;
use crate::models::{
    AdditionalCost, MarginConfig, ProjectSnapshot, TaxConfig, TeamMember, WorkSchedule,
};

/// Request body for `/team-cost`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamCostRequest {
    /// The team to cost.
    pub team: Vec<TeamMember>,
    /// Schedules supplying shift multipliers.
    #[serde(default)]
    pub schedules: Vec<WorkSchedule>,
}

/// Request body for `/coverage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRequest {
    /// Schedules to analyze.
    pub schedules: Vec<WorkSchedule>,
}

/// Request body for `/taxes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRequest {
    /// Revenue to tax.
    pub revenue: Decimal,
    /// Tax rates; all zero when omitted.
    #[serde(default)]
    pub config: TaxConfig,
}

/// Request body for `/margin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginRequest {
    /// Cost before additional costs.
    pub cost: Decimal,
    /// Margin policy.
    pub config: MarginConfig,
    /// Costs added to the cost base.
    #[serde(default)]
    pub additional_costs: Vec<AdditionalCost>,
}

/// Request body for `/investment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentRequest {
    /// Up-front investment.
    pub investment: Decimal,
    /// Return per period.
    pub returns: Vec<Decimal>,
    /// Discount rate per period; the engine default when omitted.
    #[serde(default)]
    pub discount_rate: Option<Decimal>,
}

/// Request body for `/scenarios`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRequest {
    /// The unadjusted snapshot.
    pub baseline: ProjectSnapshot,
    /// Scenarios to evaluate.
    pub scenarios: Vec<Scenario>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tax_request_config_defaults() {
        let request: TaxRequest = serde_json::from_value(json!({"revenue": "1000"})).unwrap();
        assert_eq!(request.revenue, Decimal::new(1000, 0));
        assert_eq!(request.config, TaxConfig::default());
    }

    #[test]
    fn test_investment_request_rate_is_optional() {
        let request: InvestmentRequest = serde_json::from_value(json!({
            "investment": "100",
            "returns": ["60", "60"]
        }))
        .unwrap();
        assert_eq!(request.returns.len(), 2);
        assert!(request.discount_rate.is_none());
    }

    #[test]
    fn test_margin_request_requires_config() {
        let result: Result<MarginRequest, _> = serde_json::from_value(json!({"cost": "10"}));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("missing field `config`"));
    }

    #[test]
    fn test_scenario_request_deserialization() {
        let request: ScenarioRequest = serde_json::from_value(json!({
            "baseline": {
                "project": {"name": "Desk", "contract_months": 12},
                "margin": {"type": "percentage", "value": "20"}
            },
            "scenarios": [
                {"id": "s1", "adjustments": [{"category": "salary", "percent": "5"}]}
            ]
        }))
        .unwrap();
        assert_eq!(request.baseline.project.contract_months, 12);
        assert_eq!(request.scenarios[0].adjustments.len(), 1);
    }
}

//! Integration tests for the pricing engine HTTP API.
//!
//! This test suite covers every endpoint:
//! - Team cost (benefits, shift multipliers, annual totals)
//! - Weekly coverage (hours, gaps, recommendations)
//! - Taxes and margin
//! - Investment analysis (ROI, NPV, payback)
//! - Scenario comparison
//! - Consolidated budget
//! - Full pipeline with audit trace
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use desk_pricing_engine::api::{AppState, create_router};
use desk_pricing_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let loader = ConfigLoader::load("./config/engine.yaml").expect("Failed to load config");
    AppState::new(loader.into_config())
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Reads a decimal serialized as a JSON string.
fn dec_at(value: &Value) -> Decimal {
    decimal(value.as_str().unwrap_or_else(|| panic!("not a decimal: {}", value)))
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(router, uri, body.to_string()).await
}

async fn post_raw(router: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn member(id: &str, role: &str, salary: &str, benefits: Value) -> Value {
    json!({
        "id": id,
        "name": id,
        "role": role,
        "salary": salary,
        "benefits": benefits,
        "workload_hours": "40"
    })
}

fn shift(id: &str, start: &str, end: &str, days: Vec<u8>, members: Vec<&str>, multiplier: &str) -> Value {
    json!({
        "id": id,
        "name": id,
        "start_time": start,
        "end_time": end,
        "days": days,
        "assigned_members": members,
        "multiplier": multiplier
    })
}

fn schedule(shifts: Vec<Value>, minimum_staff: u32) -> Value {
    json!({
        "id": "main",
        "name": "Main",
        "shifts": shifts,
        "coverage": {"minimum_staff": minimum_staff, "preferred_staff": minimum_staff}
    })
}

fn business_hours_schedule() -> Value {
    schedule(
        vec![shift("day", "08:00:00", "17:00:00", vec![1, 2, 3, 4, 5], vec!["m1"], "1")],
        1,
    )
}

/// One member costing exactly 8000 (no FGTS), 36% margin and 5% ISS:
/// price 12500, taxes 625, monthly net 3875.
fn pipeline_snapshot(contract_months: u32, initial_investment: &str) -> Value {
    json!({
        "project": {
            "name": "Acme Desk",
            "contract_months": contract_months,
            "start_date": "2026-01-01",
            "initial_investment": initial_investment
        },
        "team": [member("m1", "analyst", "8000", json!({"fgts_percent": "0"}))],
        "schedules": [],
        "taxes": {"iss": "5"},
        "market": {"discount_rate": "0.01", "inflation_rate": "0"},
        "margin": {"type": "percentage", "value": "36"}
    })
}

fn warning_codes(result: &Value) -> Vec<String> {
    result["audit_trace"]["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["code"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// SECTION 1: Team Cost
// =============================================================================

#[tokio::test]
async fn test_team_cost_sums_members_and_applies_multiplier() {
    let body = json!({
        "team": [
            member("m1", "analyst", "3000", json!({})),
            member("m2", "supervisor", "5000", json!({"health_insurance": "400"})),
        ],
        "schedules": [schedule(
            vec![shift("night", "22:00:00", "06:00:00", vec![1, 2, 3, 4, 5], vec!["m2"], "1.2")],
            1,
        )]
    });

    let (status, result) = post(create_router_for_test(), "/team-cost", body).await;
    assert_eq!(status, StatusCode::OK);

    // m1: 3000 + 8% FGTS = 3240
    // m2: 5000 * 1.2 + 400 health + 8% of the *base* salary (400) = 6800
    let members = result["members"].as_array().unwrap();
    assert_eq!(dec_at(&members[0]["total_cost"]), decimal("3240"));
    assert_eq!(dec_at(&members[1]["multiplier"]), decimal("1.2"));
    assert_eq!(dec_at(&members[1]["total_cost"]), decimal("6800"));

    let monthly = dec_at(&result["total_monthly_cost"]);
    assert_eq!(monthly, decimal("10040"));
    assert_eq!(dec_at(&result["total_annual_cost"]), monthly * Decimal::from(12));
    assert_eq!(result["by_role"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_team_cost_empty_team_is_zero() {
    let (status, result) = post(create_router_for_test(), "/team-cost", json!({"team": []})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&result["total_monthly_cost"]), Decimal::ZERO);
    assert_eq!(dec_at(&result["cost_per_hour"]), Decimal::ZERO);
    assert!(result["members"].as_array().unwrap().is_empty());
}

// =============================================================================
// SECTION 2: Coverage
// =============================================================================

#[tokio::test]
async fn test_coverage_business_hours_is_45_hours() {
    let body = json!({"schedules": [business_hours_schedule()]});
    let (status, result) = post(create_router_for_test(), "/coverage", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["covered_hours"], 45);
    let percentage = dec_at(&result["coverage_percentage"]);
    assert!(percentage > decimal("26.7") && percentage < decimal("26.8"));
    assert_eq!(dec_at(&result["weekend_coverage"]), Decimal::ZERO);
    assert!(!result["gaps"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_coverage_without_schedules() {
    let (status, result) =
        post(create_router_for_test(), "/coverage", json!({"schedules": []})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&result["coverage_percentage"]), Decimal::ZERO);
    assert!(result["gaps"].as_array().unwrap().is_empty());
    let recommendations = result["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 1);
    assert!(
        recommendations[0]
            .as_str()
            .unwrap()
            .starts_with("Configure at least one work schedule")
    );
}

#[tokio::test]
async fn test_coverage_full_week_has_no_gaps() {
    let body = json!({"schedules": [schedule(
        vec![shift("all", "00:00:00", "00:00:00", vec![0, 1, 2, 3, 4, 5, 6], vec!["m1"], "1")],
        1,
    )]});
    let (status, result) = post(create_router_for_test(), "/coverage", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["covered_hours"], 168);
    assert_eq!(dec_at(&result["coverage_percentage"]), Decimal::ONE_HUNDRED);
    assert!(result["gaps"].as_array().unwrap().is_empty());
}

// =============================================================================
// SECTION 3: Taxes and Margin
// =============================================================================

#[tokio::test]
async fn test_taxes_at_58_25_percent() {
    let body = json!({
        "revenue": "100000",
        "config": {
            "icms": "18", "pis": "1.65", "cofins": "7.6", "iss": "5", "ir": "15", "csll": "9",
            "custom": [{"name": "Municipal fee", "rate": "2", "base": "revenue"}]
        }
    });
    let (status, result) = post(create_router_for_test(), "/taxes", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&result["total_taxes"]), decimal("58250"));
    assert_eq!(dec_at(&result["effective_rate"]), decimal("58.25"));
    assert_eq!(result["lines"].as_array().unwrap().len(), 7);
    assert!(!result["hints"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_margin_percentage_on_80k() {
    let body = json!({
        "cost": "80000",
        "config": {"type": "percentage", "value": "25", "minimum": "15", "maximum": "35"}
    });
    let (status, result) = post(create_router_for_test(), "/margin", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&result["total_price"]).round_dp(2), decimal("106666.67"));
    assert_eq!(dec_at(&result["gross_margin_percent"]).round_dp(2), decimal("25"));
    assert_eq!(result["position"], "within_bounds");
}

#[tokio::test]
async fn test_margin_adds_additional_costs_and_flags_bounds() {
    let body = json!({
        "cost": "1000",
        "config": {"type": "fixed", "value": "100", "minimum": "20"},
        "additional_costs": [{"category": "licenses", "value": "500"}]
    });
    let (status, result) = post(create_router_for_test(), "/margin", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&result["cost_base"]), decimal("1500"));
    assert_eq!(dec_at(&result["total_price"]), decimal("1600"));
    assert_eq!(result["position"], "below_minimum");
}

#[tokio::test]
async fn test_margin_of_100_percent_is_rejected() {
    let body = json!({"cost": "1000", "config": {"type": "percentage", "value": "100"}});
    let (status, result) = post(create_router_for_test(), "/margin", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(result["code"], "INVALID_MARGIN");
}

// =============================================================================
// SECTION 4: Investment Analysis
// =============================================================================

#[tokio::test]
async fn test_investment_roi_and_payback() {
    let body = json!({
        "investment": "100000",
        "returns": ["30000", "40000", "50000", "60000"]
    });
    let (status, result) = post(create_router_for_test(), "/investment", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&result["roi"]["roi_percent"]), decimal("80"));
    assert_eq!(result["payback"]["simple_payback_period"], 3);
    assert_eq!(result["payback"]["cash_flows"].as_array().unwrap().len(), 4);
    // Engine default rate from config/engine.yaml
    assert_eq!(dec_at(&result["discount_rate"]), decimal("0.10"));
    assert!(dec_at(&result["npv"]) > Decimal::ZERO);
    assert_eq!(result["irr"]["converged"], true);
}

#[tokio::test]
async fn test_investment_roi_5_percent() {
    let body = json!({
        "investment": "100000",
        "returns": ["30000", "35000", "40000"],
        "discount_rate": "0"
    });
    let (status, result) = post(create_router_for_test(), "/investment", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&result["roi"]["roi_percent"]), decimal("5"));
    // NPV at 0% is the undiscounted net profit
    assert_eq!(dec_at(&result["npv"]), decimal("5000"));
}

#[tokio::test]
async fn test_investment_never_paid_back() {
    let body = json!({"investment": "100000", "returns": ["10000", "10000"]});
    let (status, result) = post(create_router_for_test(), "/investment", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["payback"]["simple_payback_period"], 0);
    assert_eq!(result["payback"]["discounted_payback_period"], 0);
    assert_eq!(dec_at(&result["roi"]["roi_percent"]), decimal("-80"));
}

#[tokio::test]
async fn test_investment_rate_of_minus_one_is_rejected() {
    let body = json!({"investment": "100", "returns": ["60", "60"], "discount_rate": "-1"});
    let (status, result) = post(create_router_for_test(), "/investment", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_INPUT");
}

// =============================================================================
// SECTION 5: Scenarios
// =============================================================================

fn scenario_baseline() -> Value {
    json!({
        "project": {"name": "Scenario Desk", "contract_months": 12},
        "team": [
            member("m1", "analyst", "4000", json!({})),
            member("m2", "analyst", "4000", json!({})),
        ],
        "taxes": {"iss": "5", "pis": "1.65", "cofins": "7.6"},
        "margin": {"type": "fixed", "value": "3000"}
    })
}

#[tokio::test]
async fn test_scenarios_preserve_order_and_pick_best() {
    let body = json!({
        "baseline": scenario_baseline(),
        "scenarios": [
            {"id": "raise", "name": "Salary raise", "adjustments": [{"category": "salary", "percent": "10"}]},
            {"id": "cut", "name": "Salary cut", "adjustments": [{"category": "salary", "percent": "-10"}]},
            {"id": "tax", "name": "Tax hike", "adjustments": [{"category": "taxes", "percent": "20"}]}
        ]
    });
    let (status, result) = post(create_router_for_test(), "/scenarios", body).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = result["scenarios"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["scenario_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["raise", "cut", "tax"]);
    assert_eq!(result["baseline"]["scenario_id"], "baseline");
    assert_eq!(result["best_scenario_id"], "cut");

    let deltas = result["deltas"].as_array().unwrap();
    assert!(dec_at(&deltas[0]["price_delta"]) > Decimal::ZERO);
    assert!(dec_at(&deltas[1]["price_delta"]) < Decimal::ZERO);
    assert!(dec_at(&deltas[2]["net_result_delta"]) < Decimal::ZERO);
    assert_eq!(dec_at(&deltas[2]["price_delta"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_scenarios_without_scenarios_have_no_best() {
    let body = json!({"baseline": scenario_baseline(), "scenarios": []});
    let (status, result) = post(create_router_for_test(), "/scenarios", body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(result["scenarios"].as_array().unwrap().is_empty());
    assert!(result["best_scenario_id"].is_null());
}

// =============================================================================
// SECTION 6: Budget
// =============================================================================

#[tokio::test]
async fn test_budget_monthly_and_yearly_views() {
    let mut snapshot = pipeline_snapshot(24, "0");
    snapshot["other_costs"] = json!([
        {"category": "infrastructure", "value": "500"},
        {"category": "training", "value": "200"}
    ]);
    snapshot["market"]["inflation_rate"] = json!("10");

    let (status, result) = post(create_router_for_test(), "/budget", snapshot).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(dec_at(&result["team_cost"]), decimal("8000"));
    assert_eq!(dec_at(&result["infrastructure_cost"]), decimal("500"));
    assert_eq!(dec_at(&result["other_costs"]), decimal("200"));
    assert_eq!(dec_at(&result["total_monthly_cost"]), decimal("8700"));

    let monthly = result["monthly"].as_array().unwrap();
    assert_eq!(monthly.len(), 24);
    assert_eq!(monthly[0]["month_start"], "2026-01-01");
    assert_eq!(monthly[13]["month_start"], "2027-02-01");

    let yearly = result["yearly"].as_array().unwrap();
    assert_eq!(yearly.len(), 2);
    assert_eq!(dec_at(&yearly[0]["costs"]), decimal("104400"));
    assert_eq!(dec_at(&yearly[1]["costs"]), decimal("114840"));

    let profit = dec_at(&result["monthly_profit"]);
    assert_eq!(dec_at(&result["contract_profit"]), profit * Decimal::from(24));
}

// =============================================================================
// SECTION 7: Full Pipeline
// =============================================================================

#[tokio::test]
async fn test_calculate_pipeline_figures() {
    let (status, result) =
        post(create_router_for_test(), "/calculate", pipeline_snapshot(12, "20000")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["project_name"], "Acme Desk");
    assert_eq!(dec_at(&result["team_cost"]["total_monthly_cost"]), decimal("8000"));
    assert_eq!(dec_at(&result["margin"]["total_price"]), decimal("12500"));
    assert_eq!(dec_at(&result["taxes"]["total_taxes"]), decimal("625"));

    // 12 * 3875 = 46500 returned on 20000
    assert_eq!(dec_at(&result["investment"]["roi"]["roi_percent"]), decimal("132.5"));
    assert_eq!(result["investment"]["payback"]["simple_payback_period"], 6);
    assert_eq!(dec_at(&result["budget"]["contract_profit"]), decimal("46500"));
    assert!(result["calculation_id"].is_string());
}

#[tokio::test]
async fn test_calculate_audit_trace_order() {
    let (status, result) =
        post(create_router_for_test(), "/calculate", pipeline_snapshot(12, "20000")).await;
    assert_eq!(status, StatusCode::OK);

    let steps = result["audit_trace"]["steps"].as_array().unwrap();
    let rule_ids: Vec<&str> = steps.iter().map(|s| s["rule_id"].as_str().unwrap()).collect();
    assert_eq!(
        rule_ids,
        vec!["team_cost", "coverage", "margin", "taxes", "investment", "budget"]
    );
    for (index, step) in steps.iter().enumerate() {
        assert_eq!(step["step_number"], index as u64 + 1);
    }
    assert!(!warning_codes(&result).contains(&"NEGATIVE_NET_RESULT".to_string()));
}

#[tokio::test]
async fn test_calculate_warns_on_negative_net_result() {
    let mut snapshot = pipeline_snapshot(12, "0");
    snapshot["margin"] = json!({"type": "fixed", "value": "100"});

    let (status, result) = post(create_router_for_test(), "/calculate", snapshot).await;

    assert_eq!(status, StatusCode::OK);
    assert!(warning_codes(&result).contains(&"NEGATIVE_NET_RESULT".to_string()));
}

#[tokio::test]
async fn test_calculate_warns_on_margin_below_minimum() {
    let mut snapshot = pipeline_snapshot(12, "0");
    snapshot["margin"] = json!({"type": "percentage", "value": "10", "minimum": "15"});

    let (status, result) = post(create_router_for_test(), "/calculate", snapshot).await;

    assert_eq!(status, StatusCode::OK);
    assert!(warning_codes(&result).contains(&"MARGIN_BELOW_MINIMUM".to_string()));
}

#[tokio::test]
async fn test_calculate_invalid_margin_is_422() {
    let mut snapshot = pipeline_snapshot(12, "0");
    snapshot["margin"] = json!({"type": "percentage", "value": "120"});

    let (status, result) = post(create_router_for_test(), "/calculate", snapshot).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(result["code"], "INVALID_MARGIN");
}

// =============================================================================
// SECTION 8: Error Cases
// =============================================================================

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (status, result) =
        post_raw(create_router_for_test(), "/calculate", "{\"project\": ".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_field_is_validation_error() {
    let body = json!({"project": {"contract_months": 12}});
    let (status, result) = post(create_router_for_test(), "/calculate", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "VALIDATION_ERROR");
    assert!(result["message"].as_str().unwrap().contains("margin"));
}

#[tokio::test]
async fn test_wrong_type_is_malformed_json() {
    let body = json!({"revenue": "lots"});
    let (status, result) = post(create_router_for_test(), "/taxes", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_oversized_contract_is_invalid_input() {
    let router = create_router_for_test();
    let snapshot = pipeline_snapshot(u32::MAX, "20000");

    let (status, result) = post(router.clone(), "/calculate", snapshot.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_INPUT");

    let (status, result) = post(router, "/budget", snapshot).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_missing_content_type_is_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/taxes")
                .body(Body::from(json!({"revenue": "1"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// SECTION 9: Caching across requests
// =============================================================================

#[tokio::test]
async fn test_repeated_requests_share_engine_cache() {
    let state = create_test_state();
    let router = create_router(state.clone());
    let body = json!({"team": [member("m1", "analyst", "3000", json!({}))]});

    let (_, first) = post(router.clone(), "/team-cost", body.clone()).await;
    let (_, second) = post(router, "/team-cost", body).await;

    assert_eq!(first, second);
    let stats = state.engine().caches().stats();
    assert_eq!(stats.team_cost.misses, 1);
    assert_eq!(stats.team_cost.hits, 1);
}

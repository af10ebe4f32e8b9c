//! HTTP API module for the pricing engine.
//!
//! This module exposes the engine's calculations as JSON endpoints so the
//! presentation layer can submit a snapshot and receive result records.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CoverageRequest, InvestmentRequest, MarginRequest, ScenarioRequest, TaxRequest,
    TeamCostRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;

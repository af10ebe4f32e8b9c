//! Pricing engine for multi-year service desk contracts.
//!
//! This crate turns a project snapshot (team, schedules, taxes, margin
//! policy, additional costs and market variables) into staffing costs, a sale
//! price, a tax breakdown, ROI/NPV/IRR/payback figures, weekly coverage
//! diagnostics, what-if scenario comparisons and a consolidated budget.
//!
//! The calculations in [`calculation`] are pure and synchronous. [`engine`]
//! layers memoization ([`cache`]) and an audit trace on top, and [`api`]
//! exposes the engine over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod cache;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

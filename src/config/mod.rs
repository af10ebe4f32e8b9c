//! Configuration loading for the pricing engine.
//!
//! Engine settings (cache sizing and expiry, financial defaults) are read
//! from a YAML file. Every field is optional and falls back to the defaults
//! in [`EngineConfig::default`].
//!
//! # Example
//!
//! ```no_run
//! use desk_pricing_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/engine.yaml").unwrap().into_config();
//! println!("Default discount rate: {}", config.financial.default_discount_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CacheRegionSettings, CacheSettings, EngineConfig, FinancialSettings};

//! Configuration types for the pricing engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the engine's YAML configuration file.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Sizing and expiry of one cache region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRegionSettings {
    /// Maximum number of live entries.
    pub capacity: usize,
    /// Default time-to-live for entries, in seconds.
    pub ttl_seconds: u64,
}

impl CacheRegionSettings {
    /// Returns the default time-to-live as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Settings for every cache region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Team cost results.
    pub team_cost: CacheRegionSettings,
    /// Tax breakdowns.
    pub tax: CacheRegionSettings,
    /// Investment analyses.
    pub roi: CacheRegionSettings,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            team_cost: CacheRegionSettings {
                capacity: 100,
                ttl_seconds: 5 * 60,
            },
            tax: CacheRegionSettings {
                capacity: 100,
                ttl_seconds: 10 * 60,
            },
            roi: CacheRegionSettings {
                capacity: 100,
                ttl_seconds: 10 * 60,
            },
        }
    }
}

/// Financial defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSettings {
    /// Discount rate used when a request does not supply one.
    pub default_discount_rate: Decimal,
}

impl Default for FinancialSettings {
    fn default() -> Self {
        Self {
            default_discount_rate: dec!(0.10),
        }
    }
}

/// Top-level engine configuration.
///
/// `EngineConfig::default()` matches the shipped `config/engine.yaml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cache sizing and expiry.
    pub cache: CacheSettings,
    /// Financial defaults.
    pub financial: FinancialSettings,
}

impl EngineConfig {
    /// Checks that the configuration can drive an engine.
    pub fn validate(&self) -> EngineResult<()> {
        for (name, region) in [
            ("cache.team_cost", self.cache.team_cost),
            ("cache.tax", self.cache.tax),
            ("cache.roi", self.cache.roi),
        ] {
            if region.capacity == 0 {
                return Err(EngineError::InvalidInput {
                    field: format!("{}.capacity", name),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if self.financial.default_discount_rate <= dec!(-1) {
            return Err(EngineError::InvalidInput {
                field: "financial.default_discount_rate".to_string(),
                message: "must be greater than -1".to_string(),
            });
        }
        Ok(())
    }
}

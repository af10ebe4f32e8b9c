//! Memoization of expensive calculations.
//!
//! [`CalculationCache`] is a generic bounded store with per-entry expiry.
//! [`EngineCaches`] groups one typed region per input domain so a change in,
//! say, the team invalidates cached team costs without touching tax results.

mod key;
mod store;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculation::{InvestmentAnalysis, TaxBreakdown, TeamCostBreakdown};
use crate::config::CacheSettings;

pub use key::CacheKey;
pub use store::{CacheStats, CalculationCache};

/// The input domains whose changes invalidate cached results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputDomain {
    /// Team members and their schedules.
    Team,
    /// Tax configuration or revenue.
    Tax,
    /// Investment, returns or discount rate.
    Roi,
}

impl InputDomain {
    /// Every domain.
    pub const ALL: [InputDomain; 3] = [InputDomain::Team, InputDomain::Tax, InputDomain::Roi];
}

/// Counters for every region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineCacheStats {
    /// Team cost region.
    pub team_cost: CacheStats,
    /// Tax region.
    pub tax: CacheStats,
    /// Investment region.
    pub roi: CacheStats,
}

/// The engine's cache regions.
#[derive(Debug)]
pub struct EngineCaches {
    /// Team cost breakdowns keyed on team and schedules.
    pub team_cost: CalculationCache<TeamCostBreakdown>,
    /// Tax breakdowns keyed on revenue and tax configuration.
    pub tax: CalculationCache<TaxBreakdown>,
    /// Investment analyses keyed on investment, returns and rate.
    pub roi: CalculationCache<InvestmentAnalysis>,
}

impl EngineCaches {
    /// Creates empty regions sized by `settings`.
    pub fn new(settings: &CacheSettings) -> Self {
        Self {
            team_cost: CalculationCache::new(
                "team_cost",
                settings.team_cost.capacity,
                settings.team_cost.ttl(),
            ),
            tax: CalculationCache::new("tax", settings.tax.capacity, settings.tax.ttl()),
            roi: CalculationCache::new("roi", settings.roi.capacity, settings.roi.ttl()),
        }
    }

    /// Drops every cached result derived from `domain`.
    pub fn invalidate(&self, domain: InputDomain) {
        debug!(domain = ?domain, "invalidating cache region");
        match domain {
            InputDomain::Team => self.team_cost.clear(),
            InputDomain::Tax => self.tax.clear(),
            InputDomain::Roi => self.roi.clear(),
        }
    }

    /// Drops every cached result.
    pub fn clear_all(&self) {
        for domain in InputDomain::ALL {
            self.invalidate(domain);
        }
    }

    /// Snapshot of every region's counters.
    pub fn stats(&self) -> EngineCacheStats {
        EngineCacheStats {
            team_cost: self.team_cost.stats(),
            tax: self.tax.stats(),
            roi: self.roi.stats(),
        }
    }
}

impl Default for EngineCaches {
    fn default() -> Self {
        Self::new(&CacheSettings::default())
    }
}

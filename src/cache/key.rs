//! Cache key derivation.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

use crate::error::{EngineError, EngineResult};

const KEY_SEED: u64 = 0;

/// A cache key of the form `operation_<base64 xxh64 of the JSON input>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for `operation` applied to `input`.
    ///
    /// Inputs that serialize to the same JSON produce the same key.
    pub fn new<T: Serialize + ?Sized>(operation: &str, input: &T) -> EngineResult<Self> {
        let bytes = serde_json::to_vec(input).map_err(|e| EngineError::CalculationError {
            message: format!("cannot fingerprint input for {}: {}", operation, e),
        })?;
        let hash = xxh64(&bytes, KEY_SEED);
        Ok(Self(format!(
            "{}_{}",
            operation,
            URL_SAFE_NO_PAD.encode(hash.to_be_bytes())
        )))
    }

    /// Wraps an already formatted key.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

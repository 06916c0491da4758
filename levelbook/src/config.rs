use serde::{Deserialize, Serialize};

use crate::error::{BookError, Result};

/// What [`Orderbook::add`](crate::Orderbook::add) does with an id that is
/// already resting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Refuse the order and leave the book unchanged.
    #[default]
    Reject,
    /// Take the old order's amount out of its level, then add the new one.
    Replace,
}

/// Configuration for an [`Orderbook`](crate::Orderbook).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookConfig {
    /// Tick size for level prices. `None` or a value `<= 0` keeps raw prices.
    pub precision: Option<f64>,
    /// Handling of re-added order ids.
    pub duplicates: DuplicatePolicy,
}

impl BookConfig {
    pub fn with_precision(mut self, tick: f64) -> Self {
        self.precision = Some(tick);
        self
    }

    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// # Errors
    ///
    /// Returns `BookError::InvalidConfig` for a NaN or infinite tick.
    pub fn validate(&self) -> Result<()> {
        match self.precision {
            Some(tick) if !tick.is_finite() => Err(BookError::InvalidConfig(format!(
                "precision must be finite, got {tick}"
            ))),
            _ => Ok(()),
        }
    }
}

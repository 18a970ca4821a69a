// SPDX-License-Identifier: AGPL-3.0-only

//! Event-catalog and hazard-request loading.
//!
//! The simulation stage upstream writes flat per-event populations to
//! JSON: one bedrock spectral-acceleration value and one annual activity
//! rate per event, plus the return periods the hazard job was asked for.
//! This is the recoverable boundary in front of the assert-based numeric
//! core: files come from disk, so malformed data here is an expected
//! operating condition and surfaces as [`HazardError`], not a panic.

use crate::error::HazardError;
use crate::hazard::rates_from_return_periods;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Flat per-event population for one site/period lane.
#[derive(Debug, Clone, Deserialize)]
pub struct EventCatalog {
    /// Simulated ground-motion (or derived loss) value per event.
    #[serde(rename = "bedrock_SA_g")]
    pub values: Vec<f64>,
    /// Annual occurrence rate per event.
    #[serde(rename = "event_activity")]
    pub rates: Vec<f64>,
}

impl EventCatalog {
    /// Parse a catalog from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HazardError> {
        serde_json::from_str(text).map_err(|e| HazardError::CatalogLoad(e.to_string()))
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, HazardError> {
        let text = fs::read_to_string(path)
            .map_err(|e| HazardError::CatalogLoad(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the catalog holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check the invariants the numeric core asserts, recoverably.
    ///
    /// Equal lengths, finite values, finite non-negative rates. Call this
    /// on anything loaded from disk before handing it to the curve
    /// builder, which treats violations as programming errors.
    pub fn validate(&self) -> Result<(), HazardError> {
        if self.values.len() != self.rates.len() {
            return Err(HazardError::LengthMismatch {
                values: self.values.len(),
                rates: self.rates.len(),
            });
        }
        for (index, &v) in self.values.iter().enumerate() {
            if !v.is_finite() {
                return Err(HazardError::NonFiniteValue { index });
            }
        }
        for (index, &rate) in self.rates.iter().enumerate() {
            if !rate.is_finite() || rate < 0.0 {
                return Err(HazardError::InvalidRate { index, rate });
            }
        }
        Ok(())
    }
}

/// Hazard-job request: the return periods the curve is evaluated at.
#[derive(Debug, Clone, Deserialize)]
pub struct HazardRequest {
    /// Target return periods in years, e.g. `[475, 975, 2475]`.
    #[serde(rename = "return_periods_yr")]
    pub return_periods: Vec<f64>,
}

impl HazardRequest {
    /// Parse a request from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HazardError> {
        serde_json::from_str(text).map_err(|e| HazardError::CatalogLoad(e.to_string()))
    }

    /// Target annual exceedance rates (1 / return period).
    #[must_use]
    pub fn exceedance_rates(&self) -> Vec<f64> {
        rates_from_return_periods(&self.return_periods)
    }
}

// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for the event-catalog boundary.
//!
//! The numeric core (collapse, hazard) treats malformed input as a
//! programming error and fails via fatal assertion; the catalog layer in
//! front of it is the one place where bad data is an expected operating
//! condition (files come from disk), so it gets a proper enum callers can
//! pattern-match on rather than an opaque string.

use std::fmt;

/// Errors arising from event-catalog loading and validation.
#[derive(Debug)]
pub enum HazardError {
    /// Catalog file loading failed (path, underlying IO or parse error).
    CatalogLoad(String),

    /// Value and rate sequences have different lengths.
    LengthMismatch {
        /// Number of event values in the catalog.
        values: usize,
        /// Number of event rates in the catalog.
        rates: usize,
    },

    /// A ground-motion value is NaN or infinite.
    NonFiniteValue {
        /// Index of the offending entry.
        index: usize,
    },

    /// An annual occurrence rate is negative or non-finite.
    InvalidRate {
        /// Index of the offending entry.
        index: usize,
        /// The rejected rate.
        rate: f64,
    },
}

impl fmt::Display for HazardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogLoad(msg) => write!(f, "Catalog loading failed: {msg}"),
            Self::LengthMismatch { values, rates } => {
                write!(
                    f,
                    "Catalog length mismatch: {values} values vs {rates} rates"
                )
            }
            Self::NonFiniteValue { index } => {
                write!(f, "Non-finite ground-motion value at event {index}")
            }
            Self::InvalidRate { index, rate } => {
                write!(f, "Invalid annual rate {rate} at event {index}")
            }
        }
    }
}

impl std::error::Error for HazardError {}

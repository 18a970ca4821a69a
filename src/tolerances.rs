// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized validation tolerances with numerical justification.
//!
//! Every tolerance threshold used in tests and validation binaries is
//! defined here with documentation of its origin and rationale. No ad-hoc
//! magic numbers.
//!
//! # Tolerance categories
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Machine precision | IEEE 754 f64 | 1e-10 for exact arithmetic |
//! | Regression fixture | Fixture digit count | 1e-5 for 8-digit weights |
//! | Structural invariant | Exact by construction | 0.0 residual mass |

/// Tolerance for operations that should be exact in f64 arithmetic.
///
/// f64 has ~15.9 significant digits; 1e-10 allows a few digits of
/// accumulated rounding in short compositions of exact operations
/// (sorting is a permutation, the cumulative sum is n-1 additions).
pub const EXACT_F64: f64 = 1e-10;

/// Absolute tolerance for the collapse regression fixture.
///
/// The fixture encodes the uniform three-model weight as the truncated
/// decimal 0.33333333 (8 digits), so the weighted sum differs from the
/// ideal 1/3 mean by up to ~1e-8 per unit of value. 1e-5 gives three
/// orders of margin over the truncation error at the fixture magnitudes.
pub const COLLAPSE_FIXTURE_ATOL: f64 = 1e-5;

/// Absolute tolerance for hazard-curve regression fixtures.
///
/// Curve construction is one stable sort, one cumulative sum, and one
/// linear interpolation per target — O(n) rounding steps. Reference
/// vectors are quoted to 8 decimal digits; 1e-6 matches the acceptance
/// threshold used for the repository's regression vectors.
pub const HAZARD_CURVE_ATOL: f64 = 1e-6;

/// Residual mass allowed outside model slot 0 after a full collapse.
///
/// Exactly zero, not a small epsilon: the collapse writes literal 0.0
/// into every folded slot, so any non-zero residual is a partitioning
/// logic error (overlapping sources, short weight vector), never
/// rounding. Widening this would mask real bugs.
pub const COLLAPSE_RESIDUAL: f64 = 0.0;

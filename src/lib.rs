// SPDX-License-Identifier: AGPL-3.0-only

//! psha-core — probabilistic seismic hazard aggregation pipeline.
//!
//! Two-stage core: collapse the competing ground-motion-model dimension
//! of a simulated event-value tensor into one composite value per event
//! (logic-tree collapsing), then convert the resulting (value, rate)
//! event population into a hazard curve — the ground-motion level
//! exceeded at each target annual exceedance rate.
//!
//! Ground-motion models themselves, coefficient tables, and source-zone
//! geometry are external collaborators; this crate only sees the numeric
//! tensor they produce.
//!
//! ## Modules
//!   - `tensor` — event-value tensor with named trailing axes
//!   - `source` — seismic source protocol (event subset + model weights)
//!   - `collapse` — per-source logic-tree collapsing
//!   - `hazard` — cumulative-curve construction and rate interpolation
//!   - `catalog` — JSON event-catalog and hazard-request loading
//!   - `tolerances` — centralized, documented check thresholds
//!   - `validation` — shared harness for validation binaries
//!
//! ## Validation binaries
//!   - `validate_hazard` — regression fixtures and invariant checks for
//!     both pipeline stages

pub mod catalog;
pub mod collapse;
pub mod error;
pub mod hazard;
pub mod source;
pub mod tensor;
pub mod tolerances;
pub mod validation;

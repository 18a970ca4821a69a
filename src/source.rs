// SPDX-License-Identifier: AGPL-3.0-only

//! Seismic source protocol.
//!
//! A source is a modeled earthquake-generating zone owning (a) a subset
//! of the global event axis and (b) a relative-credibility weight per
//! participating ground-motion model. The collapse pipeline only reads
//! these two sequences, so the protocol is a two-method trait rather
//! than any inheritance hierarchy; the full source-zone machinery
//! (geometry, recurrence) lives outside this crate and implements it.

/// Read-only view of a seismic source as the collapser sees it.
pub trait Source {
    /// Ordered positions into the global event axis owned by this source.
    ///
    /// Not necessarily contiguous. Disjointness from other sources'
    /// subsets is the caller's invariant; the collapse post-condition
    /// catches violations after the fact.
    fn event_indices(&self) -> &[usize];

    /// Relative weight per ground-motion model, over a prefix of the
    /// model axis. Weights are relative credibilities, not probabilities;
    /// they need not sum to 1.
    fn model_weights(&self) -> &[f64];
}

/// Concrete source zone: a named event subset with its model weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceZone {
    name: String,
    event_indices: Vec<usize>,
    model_weights: Vec<f64>,
}

impl SourceZone {
    /// Build a source zone. Fatal if the weight vector is empty — a
    /// source that weights no model cannot participate in collapsing.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        event_indices: Vec<usize>,
        model_weights: Vec<f64>,
    ) -> Self {
        let name = name.into();
        assert!(
            !model_weights.is_empty(),
            "source zone '{name}' has an empty model-weight vector"
        );
        Self {
            name,
            event_indices,
            model_weights,
        }
    }

    /// Zone name (diagnostic only).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Source for SourceZone {
    fn event_indices(&self) -> &[usize] {
        &self.event_indices
    }

    fn model_weights(&self) -> &[f64] {
        &self.model_weights
    }
}

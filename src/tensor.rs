// SPDX-License-Identifier: AGPL-3.0-only

//! Event-value tensor with named trailing axes.
//!
//! Simulated ground motions live in one multi-dimensional buffer whose
//! last five axes are fixed by convention:
//!
//! ```text
//! (outer..., ground-motion model, recurrence model, site, event, period)
//! ```
//!
//! Any number of leading axes (typically a "spawn" axis of stochastic
//! realizations) are opaque and preserved unchanged through every
//! operation. Axis positions are therefore computed from the rank rather
//! than hardcoded, so the same code handles rank-5 and rank-7 buffers
//! alike.
//!
//! The event axis indexes a flat, globally unique event identifier space
//! shared with every source's event-index subset.

use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, Axis};

/// Number of semantically fixed trailing axes.
pub const FIXED_AXES: usize = 5;

/// Multi-dimensional buffer of per-event ground-motion (or loss) values.
///
/// Thin newtype over `ndarray::ArrayD<f64>` adding named accessors for
/// the five fixed trailing axes. Construction asserts rank >= 5; the
/// collapse pipeline additionally requires at least one outer axis.
#[derive(Debug, Clone, PartialEq)]
pub struct EventValueTensor {
    values: ArrayD<f64>,
}

impl EventValueTensor {
    /// Wrap a raw array. Fatal if the rank cannot carry the five fixed axes.
    #[must_use]
    pub fn new(values: ArrayD<f64>) -> Self {
        assert!(
            values.ndim() >= FIXED_AXES,
            "event-value tensor needs rank >= {FIXED_AXES}, got rank {}",
            values.ndim()
        );
        Self { values }
    }

    /// Tensor rank, counting outer axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.values.ndim()
    }

    /// Full shape, outer axes first.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// Ground-motion-model axis (fifth from the end).
    #[must_use]
    pub fn model_axis(&self) -> Axis {
        Axis(self.values.ndim() - 5)
    }

    /// Recurrence-model axis (fourth from the end).
    #[must_use]
    pub fn recurrence_axis(&self) -> Axis {
        Axis(self.values.ndim() - 4)
    }

    /// Site axis (third from the end).
    #[must_use]
    pub fn site_axis(&self) -> Axis {
        Axis(self.values.ndim() - 3)
    }

    /// Event axis (second from the end).
    #[must_use]
    pub fn event_axis(&self) -> Axis {
        Axis(self.values.ndim() - 2)
    }

    /// Spectral-period axis (last).
    #[must_use]
    pub fn period_axis(&self) -> Axis {
        Axis(self.values.ndim() - 1)
    }

    /// Length of the ground-motion-model axis.
    #[must_use]
    pub fn n_models(&self) -> usize {
        self.values.len_of(self.model_axis())
    }

    /// Length of the event axis.
    #[must_use]
    pub fn n_events(&self) -> usize {
        self.values.len_of(self.event_axis())
    }

    /// Shared view of the backing array.
    #[must_use]
    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// Mutable view of the backing array.
    pub fn values_mut(&mut self) -> &mut ArrayD<f64> {
        &mut self.values
    }

    /// Read-only view (for slicing without cloning).
    #[must_use]
    pub fn view(&self) -> ArrayViewD<'_, f64> {
        self.values.view()
    }

    /// Mutable view.
    pub fn view_mut(&mut self) -> ArrayViewMutD<'_, f64> {
        self.values.view_mut()
    }

    /// Unwrap into the backing array.
    #[must_use]
    pub fn into_values(self) -> ArrayD<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn rank6(shape: [usize; 6]) -> EventValueTensor {
        EventValueTensor::new(ArrayD::zeros(IxDyn(&shape)))
    }

    #[test]
    fn axis_positions_rank6() {
        // (spawn, model, recurrence, site, event, period)
        let t = rank6([2, 3, 1, 4, 10, 5]);
        assert_eq!(t.model_axis(), Axis(1));
        assert_eq!(t.recurrence_axis(), Axis(2));
        assert_eq!(t.site_axis(), Axis(3));
        assert_eq!(t.event_axis(), Axis(4));
        assert_eq!(t.period_axis(), Axis(5));
        assert_eq!(t.n_models(), 3);
        assert_eq!(t.n_events(), 10);
    }

    #[test]
    fn axis_positions_track_outer_axes() {
        // Two leading opaque axes: positions shift, trailing semantics do not.
        let t = EventValueTensor::new(ArrayD::zeros(IxDyn(&[2, 2, 3, 1, 1, 6, 4])));
        assert_eq!(t.model_axis(), Axis(2));
        assert_eq!(t.event_axis(), Axis(5));
        assert_eq!(t.n_models(), 3);
        assert_eq!(t.n_events(), 6);
    }

    #[test]
    fn rank5_is_minimal() {
        let t = EventValueTensor::new(ArrayD::zeros(IxDyn(&[3, 1, 1, 8, 2])));
        assert_eq!(t.model_axis(), Axis(0));
    }

    #[test]
    #[should_panic(expected = "rank >= 5")]
    fn rank4_rejected() {
        let _ = EventValueTensor::new(ArrayD::zeros(IxDyn(&[3, 1, 8, 2])));
    }
}

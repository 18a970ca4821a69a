// SPDX-License-Identifier: AGPL-3.0-only

//! Logic-tree collapsing across ground-motion models.
//!
//! Each source zone carries a relative-credibility weight per candidate
//! ground-motion model. Collapsing folds the model axis of the shared
//! event-value tensor down to a single composite slot per event,
//! honoring each source's weights over its own event subset.
//!
//! Write discipline: every source writes its weighted sum into model
//! slot 0 at its event indices and zeroes the slots its weight vector
//! covers. Slots beyond a source's weight prefix are left untouched —
//! the final residual assertion proves they held no mass. A non-zero
//! residual is a partitioning logic error (overlapping event subsets,
//! a weight vector shorter than the populated model slots, or events no
//! source claims), never a data-quality issue, and is fatal.
//!
//! The tensor argument of [`collapse_per_source`] is mutated in place by
//! design; callers needing the pre-collapse values must copy first.

use ndarray::{ArrayD, ArrayViewD, Axis, Slice, Zip};

use crate::source::Source;
use crate::tensor::EventValueTensor;
use crate::tolerances::COLLAPSE_RESIDUAL;

/// Weighted sum over the first `weights.len()` model-axis slices.
///
/// Slices at positions past the weight vector do not participate at all
/// — they are excluded, not zero-scaled. The model axis is removed from
/// the result (rank drops by one).
///
/// Fatal if the weight vector is empty or longer than the model axis.
#[must_use]
pub fn weighted_reduce(tensor: &ArrayD<f64>, weights: &[f64], model_axis: Axis) -> ArrayD<f64> {
    let n_models = tensor.len_of(model_axis);
    assert!(!weights.is_empty(), "weighted reduce needs at least one model weight");
    assert!(
        weights.len() <= n_models,
        "weight vector length {} exceeds model-axis length {n_models}",
        weights.len()
    );

    let mut folded = tensor.index_axis(model_axis, 0).to_owned();
    folded *= weights[0];
    for (slot, &w) in weights.iter().enumerate().skip(1) {
        let slice = tensor.index_axis(model_axis, slot);
        Zip::from(&mut folded)
            .and(&slice)
            .for_each(|acc, &v| *acc += w * v);
    }
    folded
}

/// Collapse the model axis to length 1, or pass the tensor through.
///
/// With `do_collapse` false this is the identity — same rank, same
/// model-axis length. With it true the axis is reduced by
/// [`weighted_reduce`] and reinserted at length 1, so downstream code
/// sees a stable rank either way. Pure; never touches the input buffer.
#[must_use]
pub fn collapse_if_requested(
    tensor: ArrayD<f64>,
    weights: &[f64],
    do_collapse: bool,
    model_axis: Axis,
) -> ArrayD<f64> {
    if !do_collapse {
        return tensor;
    }
    weighted_reduce(&tensor, weights, model_axis).insert_axis(model_axis)
}

/// Collapse the model axis source by source, writing through the shared
/// tensor, and return a view trimmed to model slot 0.
///
/// For each source in the order given: select the sub-tensor at that
/// source's event indices, reduce its model axis with that source's
/// weights, write the result into model slot 0 of the original tensor at
/// those indices, and zero the slots the weight vector covers. After all
/// sources, the total mass left in model slots `[1, G)` must be exactly
/// zero — asserted, fatal on violation.
///
/// The returned view shares the caller's backing storage: the model axis
/// is structurally trimmed to length 1, not recomputed by summation.
/// With `do_collapse` false the tensor is returned unchanged, full rank.
pub fn collapse_per_source<'a, S: Source>(
    tensor: &'a mut EventValueTensor,
    sources: &[S],
    do_collapse: bool,
) -> ArrayViewD<'a, f64> {
    if !do_collapse {
        return tensor.view();
    }
    assert!(
        tensor.ndim() >= 6,
        "per-source collapse needs at least one outer axis: rank {} < 6",
        tensor.ndim()
    );

    let model_axis = tensor.model_axis();
    let event_axis = tensor.event_axis();
    let n_models = tensor.n_models();
    // Once a model slot is selected the event axis shifts down by one
    // (the model axis precedes it).
    let event_within_slot = Axis(event_axis.index() - 1);

    for source in sources {
        let indices = source.event_indices();
        let weights = source.model_weights();
        assert!(
            weights.len() <= n_models,
            "source weight vector length {} exceeds model-axis length {n_models}",
            weights.len()
        );

        // Sub-tensor restricted to this source's events, all other axes full.
        let sub = tensor.values().select(event_axis, indices);
        let collapsed = collapse_if_requested(sub, weights, true, model_axis);
        let folded = collapsed.index_axis_move(model_axis, 0);

        // Fold into slot 0 at the source's event positions.
        let mut slot0 = tensor.values_mut().index_axis_mut(model_axis, 0);
        for (k, &ev) in indices.iter().enumerate() {
            slot0
                .index_axis_mut(event_within_slot, ev)
                .assign(&folded.index_axis(event_within_slot, k));
        }
        drop(slot0);

        // The mass in slots [1, W) now lives in slot 0. Slots >= W stay
        // untouched; the residual assertion below proves they were empty.
        for slot in 1..weights.len() {
            let mut plane = tensor.values_mut().index_axis_mut(model_axis, slot);
            for &ev in indices {
                plane.index_axis_mut(event_within_slot, ev).fill(0.0);
            }
        }
    }

    let residual: f64 = tensor
        .values()
        .slice_axis(model_axis, Slice::from(1..))
        .sum();
    assert!(
        residual == COLLAPSE_RESIDUAL,
        "residual mass {residual} outside model slot 0 after collapse: \
         overlapping sources, short weight vector, or unclaimed events"
    );

    tensor.values().slice_axis(model_axis, Slice::from(0..1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceZone;
    use ndarray::IxDyn;

    /// Rank-6 tensor (spawn, model, recurrence, site, event, period) with
    /// per-(model, event) values and zeros elsewhere.
    fn rank6_tensor(per_model_event: &[Vec<f64>]) -> EventValueTensor {
        let n_models = per_model_event.len();
        let n_events = per_model_event[0].len();
        let mut values = ArrayD::zeros(IxDyn(&[1, n_models, 1, 1, n_events, 1]));
        for (m, row) in per_model_event.iter().enumerate() {
            for (e, &v) in row.iter().enumerate() {
                values[[0, m, 0, 0, e, 0]] = v;
            }
        }
        EventValueTensor::new(values)
    }

    #[test]
    fn weighted_reduce_sums_prefix() {
        let t = rank6_tensor(&[vec![1.0, 2.0], vec![10.0, 20.0], vec![100.0, 200.0]]);
        let folded = weighted_reduce(t.values(), &[1.0, 0.5, 0.25], t.model_axis());
        assert_eq!(folded.ndim(), 5, "model axis removed");
        assert_eq!(folded[[0, 0, 0, 0, 0]], 1.0 + 5.0 + 25.0);
        assert_eq!(folded[[0, 0, 0, 1, 0]], 2.0 + 10.0 + 50.0);
    }

    #[test]
    fn weighted_reduce_ignores_slices_past_prefix() {
        // Poison in the third model slot must not leak into a 2-weight sum.
        let clean = rank6_tensor(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![0.0, 0.0]]);
        let poisoned = rank6_tensor(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![1e9, -1e9]]);
        let w = [0.6, 0.4];
        let a = weighted_reduce(clean.values(), &w, clean.model_axis());
        let b = weighted_reduce(poisoned.values(), &w, poisoned.model_axis());
        assert_eq!(a, b, "slices past the weight prefix must be excluded, not scaled");
    }

    #[test]
    #[should_panic(expected = "exceeds model-axis length")]
    fn weighted_reduce_rejects_long_weight_vector() {
        let t = rank6_tensor(&[vec![1.0], vec![2.0]]);
        let _ = weighted_reduce(t.values(), &[0.5, 0.3, 0.2], t.model_axis());
    }

    #[test]
    fn collapse_if_requested_false_is_identity() {
        let t = rank6_tensor(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let before = t.values().clone();
        let after = collapse_if_requested(t.into_values(), &[0.5, 0.5], false, Axis(1));
        assert_eq!(after, before, "non-collapse must be element- and shape-identical");
    }

    #[test]
    fn collapse_if_requested_true_keeps_rank() {
        let t = rank6_tensor(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let out = collapse_if_requested(t.into_values(), &[0.5, 0.5], true, Axis(1));
        assert_eq!(out.ndim(), 6, "singleton model axis reinserted");
        assert_eq!(out.shape()[1], 1);
        assert_eq!(out[[0, 0, 0, 0, 0, 0]], 2.0);
        assert_eq!(out[[0, 0, 0, 0, 1, 0]], 3.0);
    }

    #[test]
    fn collapse_per_source_folds_disjoint_sources() {
        let mut t = rank6_tensor(&[
            vec![1.0, 10.0, 2.0, 20.0],
            vec![3.0, 30.0, 4.0, 40.0],
        ]);
        let sources = vec![
            SourceZone::new("even", vec![0, 2], vec![1.0, 1.0]),
            SourceZone::new("odd", vec![1, 3], vec![0.5, 0.5]),
        ];
        let view = collapse_per_source(&mut t, &sources, true);
        assert_eq!(view.shape(), &[1, 1, 1, 1, 4, 1]);
        assert_eq!(view[[0, 0, 0, 0, 0, 0]], 4.0);
        assert_eq!(view[[0, 0, 0, 0, 1, 0]], 20.0);
        assert_eq!(view[[0, 0, 0, 0, 2, 0]], 6.0);
        assert_eq!(view[[0, 0, 0, 0, 3, 0]], 30.0);
    }

    #[test]
    fn collapse_per_source_zeroes_folded_slots() {
        let mut t = rank6_tensor(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let sources = vec![SourceZone::new("all", vec![0, 1], vec![1.0, 1.0])];
        let _ = collapse_per_source(&mut t, &sources, true);
        // Mutated in place: slot 1 holds exactly zero for every event.
        assert_eq!(t.values()[[0, 1, 0, 0, 0, 0]], 0.0);
        assert_eq!(t.values()[[0, 1, 0, 0, 1, 0]], 0.0);
        assert_eq!(t.values()[[0, 0, 0, 0, 0, 0]], 4.0);
    }

    #[test]
    fn collapse_per_source_false_is_untouched() {
        let mut t = rank6_tensor(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let before = t.clone();
        let sources = vec![SourceZone::new("all", vec![0, 1], vec![1.0, 1.0])];
        {
            let view = collapse_per_source(&mut t, &sources, false);
            assert_eq!(view.shape(), &[1, 2, 1, 1, 2, 1], "full model axis kept");
        }
        assert_eq!(t, before);
    }

    #[test]
    #[should_panic(expected = "residual mass")]
    fn short_weight_vector_over_populated_slot_is_fatal() {
        // Slot 1 holds mass but the source only weights slot 0.
        let mut t = rank6_tensor(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let sources = vec![SourceZone::new("short", vec![0, 1], vec![1.0])];
        let _ = collapse_per_source(&mut t, &sources, true);
    }

    #[test]
    #[should_panic(expected = "residual mass")]
    fn unclaimed_event_with_mass_is_fatal() {
        // Event 1 belongs to no source; its slot-1 mass survives.
        let mut t = rank6_tensor(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let sources = vec![SourceZone::new("partial", vec![0], vec![1.0, 1.0])];
        let _ = collapse_per_source(&mut t, &sources, true);
    }

    #[test]
    #[should_panic(expected = "at least one outer axis")]
    fn rank5_rejected_for_per_source_collapse() {
        let mut t = EventValueTensor::new(ArrayD::zeros(IxDyn(&[2, 1, 1, 2, 1])));
        let sources = vec![SourceZone::new("all", vec![0, 1], vec![1.0, 1.0])];
        let _ = collapse_per_source(&mut t, &sources, true);
    }

    #[test]
    fn outer_axes_pass_through() {
        // Rank 7 with two leading spawn axes: collapse still lands on the
        // model axis computed from the rank.
        let mut values = ArrayD::zeros(IxDyn(&[2, 1, 2, 1, 1, 2, 1]));
        for spawn in 0..2 {
            for m in 0..2 {
                for e in 0..2 {
                    values[IxDyn(&[spawn, 0, m, 0, 0, e, 0])] =
                        (spawn + 1) as f64 * 10.0 + e as f64;
                }
            }
        }
        let mut t = EventValueTensor::new(values);
        let sources = vec![SourceZone::new("all", vec![0, 1], vec![0.5, 0.5])];
        let view = collapse_per_source(&mut t, &sources, true);
        assert_eq!(view.shape(), &[2, 1, 1, 1, 1, 2, 1]);
        assert_eq!(view[IxDyn(&[0, 0, 0, 0, 0, 1, 0])], 11.0);
        assert_eq!(view[IxDyn(&[1, 0, 0, 0, 0, 0, 0])], 20.0);
    }
}

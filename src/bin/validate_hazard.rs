// SPDX-License-Identifier: AGPL-3.0-only

//! Hazard Pipeline Validation — collapse + curve regression fixtures.
//!
//! Validates both stages of the aggregation pipeline against hardcoded
//! regression fixtures and structural invariants:
//!
//! **Logic-tree collapse:**
//! - Three-model uniform-weight fixture folds to `[[2], [70]]`
//! - Residual mass outside model slot 0 is exactly zero
//! - Slices past a source's weight prefix are excluded, not zero-scaled
//! - Non-collapse is the identity
//!
//! **Hazard curve:**
//! - Staircase population reproduces hand-computed values at and between
//!   cumulative-rate knots
//! - Unresolvable target rates return the exact `0` sentinel
//! - Rates at or below the smallest cumulative bucket return the top value
//! - Midpoint of a two-sample curve interpolates to the arithmetic mean

use ndarray::{ArrayD, IxDyn};
use psha_core::collapse::{collapse_per_source, weighted_reduce};
use psha_core::hazard::{build_cumulative_curve, build_hazard_curve, value_at_target_rate};
use psha_core::source::SourceZone;
use psha_core::tensor::EventValueTensor;
use psha_core::tolerances::{COLLAPSE_FIXTURE_ATOL, EXACT_F64, HAZARD_CURVE_ATOL};
use psha_core::validation::ValidationHarness;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Hazard Pipeline Validation                                  ║");
    println!("║  logic-tree collapse + hazard-curve regression               ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut harness = ValidationHarness::new("hazard_pipeline");

    check_collapse_fixture(&mut harness);
    check_weight_prefix_scoping(&mut harness);
    check_non_collapse_identity(&mut harness);
    check_curve_staircase(&mut harness);
    check_curve_boundaries(&mut harness);
    check_midpoint_interpolation(&mut harness);

    println!();
    harness.finish();
}

/// Regression fixture: values [1, 70, 3, 60, 2, 80] laid out over three
/// ground-motion models and two events, uniform weight 0.33333333 per
/// model, collapse enabled. Expected folded values: [2, 70].
fn check_collapse_fixture(harness: &mut ValidationHarness) {
    println!("[1] Logic-Tree Collapse — Regression Fixture");

    // (spawn, model, recurrence, site, event, period)
    let mut values = ArrayD::zeros(IxDyn(&[1, 3, 1, 1, 2, 1]));
    let per_model_event = [[1.0, 70.0], [3.0, 60.0], [2.0, 80.0]];
    for (m, row) in per_model_event.iter().enumerate() {
        for (e, &v) in row.iter().enumerate() {
            values[[0, m, 0, 0, e, 0]] = v;
        }
    }
    let mut tensor = EventValueTensor::new(values);
    let sources = vec![SourceZone::new(
        "fixture",
        vec![0, 1],
        vec![0.333_333_33; 3],
    )];

    {
        let view = collapse_per_source(&mut tensor, &sources, true);
        harness.check_abs(
            "collapse fixture event 0",
            view[[0, 0, 0, 0, 0, 0]],
            2.0,
            COLLAPSE_FIXTURE_ATOL,
        );
        harness.check_abs(
            "collapse fixture event 1",
            view[[0, 0, 0, 0, 1, 0]],
            70.0,
            COLLAPSE_FIXTURE_ATOL,
        );
    }

    // Folded slots hold literal zeros; the residual is exact, not small.
    let residual: f64 = (1..3)
        .map(|m| {
            (0..2)
                .map(|e| tensor.values()[[0, m, 0, 0, e, 0]])
                .sum::<f64>()
        })
        .sum();
    harness.check_exact("residual mass outside slot 0", residual, 0.0);
}

/// Poison values in model slots past the weight prefix must not change
/// the weighted sum — excluded slices, not zero-scaled ones.
fn check_weight_prefix_scoping(harness: &mut ValidationHarness) {
    println!("[2] Logic-Tree Collapse — Weight-Prefix Scoping");

    let mut clean = ArrayD::zeros(IxDyn(&[1, 3, 1, 1, 2, 1]));
    clean[[0, 0, 0, 0, 0, 0]] = 1.0;
    clean[[0, 0, 0, 0, 1, 0]] = 2.0;
    clean[[0, 1, 0, 0, 0, 0]] = 3.0;
    clean[[0, 1, 0, 0, 1, 0]] = 4.0;

    let mut poisoned = clean.clone();
    poisoned[[0, 2, 0, 0, 0, 0]] = 1e12;
    poisoned[[0, 2, 0, 0, 1, 0]] = -1e12;

    let weights = [0.7, 0.3];
    let a = weighted_reduce(&clean, &weights, ndarray::Axis(1));
    let b = weighted_reduce(&poisoned, &weights, ndarray::Axis(1));
    harness.check_bool("poison past weight prefix ignored", a == b);
}

/// `do_collapse = false` must leave the tensor untouched, full rank.
fn check_non_collapse_identity(harness: &mut ValidationHarness) {
    println!("[3] Logic-Tree Collapse — Non-Collapse Identity");

    let mut values = ArrayD::zeros(IxDyn(&[1, 2, 1, 1, 3, 1]));
    for e in 0..3 {
        values[[0, 0, 0, 0, e, 0]] = e as f64 + 0.5;
        values[[0, 1, 0, 0, e, 0]] = e as f64 * 2.0;
    }
    let mut tensor = EventValueTensor::new(values.clone());
    let sources = vec![SourceZone::new("all", vec![0, 1, 2], vec![1.0, 1.0])];

    let unchanged = {
        let view = collapse_per_source(&mut tensor, &sources, false);
        view.shape() == &[1, 2, 1, 1, 3, 1] && view == values.view()
    };
    harness.check_bool("non-collapse is identity", unchanged);
}

/// Fifteen-event staircase: values 1.5 down to 0.1 in 0.1 steps, uniform
/// rate 0.1, so the cumulative curve has knots at 0.1, 0.2, ..., 1.5.
/// Targets at knots and mid-interval reproduce hand-computed values.
fn check_curve_staircase(harness: &mut ValidationHarness) {
    println!("[4] Hazard Curve — Staircase Regression");

    let values: Vec<f64> = (0..15).map(|i| 1.5 - 0.1 * i as f64).collect();
    let rates = vec![0.1; 15];
    let targets = [
        0.02, 0.05, 0.1, 0.15, 0.25, 0.35, 0.45, 0.65, 0.85, 1.05, 1.25, 1.45, 1.5, 2.0,
    ];
    // Mid-interval targets sit halfway down each 0.1-wide value step; the
    // knot at 1.5 lands on the upper endpoint where the fraction is zero.
    let expected = [
        1.5, 1.5, 1.5, 1.45, 1.35, 1.25, 1.15, 0.95, 0.75, 0.55, 0.35, 0.15, 0.2, 0.0,
    ];

    let curve = build_hazard_curve(&values, &rates, &targets);
    for ((&target, &got), &want) in targets.iter().zip(curve.iter()).zip(expected.iter()) {
        harness.check_abs(
            &format!("staircase target rate {target}"),
            got,
            want,
            HAZARD_CURVE_ATOL,
        );
    }
}

/// Boundary contracts: beyond the sampled range the sentinel is exactly
/// 0; at or below the smallest cumulative rate the top value is returned
/// exactly.
fn check_curve_boundaries(harness: &mut ValidationHarness) {
    println!("[5] Hazard Curve — Boundary Returns");

    let (sv, cum) = build_cumulative_curve(&[0.9, 0.4, 0.7], &[0.02, 0.05, 0.01]);
    harness.check_exact(
        "unresolvable rate sentinel",
        value_at_target_rate(&sv, &cum, 1.0),
        0.0,
    );
    harness.check_exact(
        "rarer-than-sample returns top value",
        value_at_target_rate(&sv, &cum, 0.001),
        0.9,
    );
    harness.check_exact(
        "smallest cumulative rate returns top value",
        value_at_target_rate(&sv, &cum, cum[0]),
        0.9,
    );
}

/// Two samples, target at the cumulative midpoint: the arithmetic mean.
fn check_midpoint_interpolation(harness: &mut ValidationHarness) {
    println!("[6] Hazard Curve — Midpoint Exactness");

    let (v1, v2) = (0.62, 0.18);
    let (r1, r2) = (0.004, 0.01);
    let (sv, cum) = build_cumulative_curve(&[v1, v2], &[r1, r2]);
    let got = value_at_target_rate(&sv, &cum, r1 + 0.5 * r2);
    harness.check_abs("midpoint gives mean", got, 0.5 * (v1 + v2), EXACT_F64);
}

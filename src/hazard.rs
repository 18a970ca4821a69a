// SPDX-License-Identifier: AGPL-3.0-only

//! Hazard-curve construction from a flat event population.
//!
//! Given one (ground-motion value, annual occurrence rate) pair per
//! simulated event, the builder inverts the empirical survival curve:
//! sort values descending, accumulate rates, then read off the value
//! reached at each requested annual exceedance rate by binary search and
//! linear interpolation.
//!
//! Failure semantics: malformed input (non-finite values) is a
//! programming error upstream and fails via fatal assertion. The one
//! expected edge — a target rate more frequent than the simulated sample
//! can resolve — is not an error: it is surfaced as
//! [`TargetRateOutcome::Unresolvable`] and collapses to the documented
//! `0.0` sentinel at the external entry point.

use rayon::prelude::*;

/// Outcome of a single target-rate lookup on the cumulative curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetRateOutcome {
    /// The target rate fell inside the sampled cumulative range.
    Resolved(f64),
    /// The target rate exceeds the total sampled rate: the requested
    /// return period is shorter than the simulation can resolve.
    Unresolvable,
}

impl TargetRateOutcome {
    /// Collapse to the external contract: unresolvable rates map to 0.
    #[must_use]
    pub fn value_or_zero(self) -> f64 {
        match self {
            Self::Resolved(v) => v,
            Self::Unresolvable => 0.0,
        }
    }
}

/// Empirical survival curve: values sorted descending, rates accumulated.
///
/// `cumulative_rates[i]` is the total annual rate of all events whose
/// value is `>= sorted_values[i]` (inclusive running sum). No
/// interpolation happens here; this only establishes the step function.
///
/// Fatal if the two sequences differ in length. Sorting uses the IEEE
/// total order, so this stage tolerates non-finite values — the external
/// entry point rejects them before they get this far.
#[must_use]
pub fn build_cumulative_curve(values: &[f64], rates: &[f64]) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(
        values.len(),
        rates.len(),
        "event population mismatch: {} values vs {} rates",
        values.len(),
        rates.len()
    );

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let sorted_values: Vec<f64> = order.iter().map(|&i| values[i]).collect();
    let mut cumulative_rates = Vec::with_capacity(order.len());
    let mut running = 0.0;
    for &i in &order {
        running += rates[i];
        cumulative_rates.push(running);
    }
    (sorted_values, cumulative_rates)
}

/// Locate a single target rate on the cumulative curve.
///
/// Left-biased binary search for the insertion index `i` with
/// `cumulative_rates[i-1] < target_rate <= cumulative_rates[i]`, then:
///
/// - `i == len`: [`TargetRateOutcome::Unresolvable`] — the rate is more
///   frequent than the total sampled rate.
/// - `i == 0`: `sorted_values[0]` exactly, no interpolation — the rate
///   is rarer than any sampled cumulative bucket.
/// - otherwise: linear interpolation with the fraction running against
///   the decreasing direction:
///   `sv[i-1] + (sv[i] - sv[i-1]) * (cum[i] - target) / (cum[i] - cum[i-1])`.
///
/// The interpolation interval always has positive width: the left-biased
/// search lands on the first index of any duplicate run, so a zero-rate
/// event can never place both endpoints on the same cumulative value.
#[must_use]
pub fn lookup_value_at_rate(
    sorted_values: &[f64],
    cumulative_rates: &[f64],
    target_rate: f64,
) -> TargetRateOutcome {
    let i = cumulative_rates.partition_point(|&r| r < target_rate);
    if i == cumulative_rates.len() {
        return TargetRateOutcome::Unresolvable;
    }
    if i == 0 {
        return TargetRateOutcome::Resolved(sorted_values[0]);
    }

    let (rate_lo, rate_hi) = (cumulative_rates[i - 1], cumulative_rates[i]);
    debug_assert!(
        rate_hi > rate_lo,
        "left-biased search landed on a zero-width cumulative interval"
    );
    let fraction = (rate_hi - target_rate) / (rate_hi - rate_lo);
    let (value_lo, value_hi) = (sorted_values[i - 1], sorted_values[i]);
    TargetRateOutcome::Resolved(value_lo + (value_hi - value_lo) * fraction)
}

/// Single-target convenience over [`lookup_value_at_rate`], preserving
/// the external `0.0`-sentinel contract for unresolvable rates.
#[must_use]
pub fn value_at_target_rate(
    sorted_values: &[f64],
    cumulative_rates: &[f64],
    target_rate: f64,
) -> f64 {
    lookup_value_at_rate(sorted_values, cumulative_rates, target_rate).value_or_zero()
}

/// Hazard curve: the ground-motion value reached at each target annual
/// exceedance rate, in the order given.
///
/// External entry point for the whole builder. All assertions are fatal:
/// every input value, the cumulative curve, and every output value must
/// be finite. There is no recoverable-error path in this component.
#[must_use]
pub fn build_hazard_curve(values: &[f64], rates: &[f64], target_rates: &[f64]) -> Vec<f64> {
    assert!(
        values.iter().all(|v| v.is_finite()),
        "non-finite ground-motion value in hazard input"
    );

    let (sorted_values, cumulative_rates) = build_cumulative_curve(values, rates);
    assert!(
        cumulative_rates.iter().all(|r| r.is_finite()),
        "non-finite cumulative rate"
    );

    let curve: Vec<f64> = target_rates
        .iter()
        .map(|&t| value_at_target_rate(&sorted_values, &cumulative_rates, t))
        .collect();
    assert!(
        curve.iter().all(|v| v.is_finite()),
        "non-finite hazard value in output"
    );
    curve
}

/// Batch form over independent event populations, one curve each.
///
/// Populations share nothing, so the batch parallelizes across them with
/// rayon. Output order matches input order.
#[must_use]
pub fn build_hazard_curves(
    populations: &[(&[f64], &[f64])],
    target_rates: &[f64],
) -> Vec<Vec<f64>> {
    populations
        .par_iter()
        .map(|&(values, rates)| build_hazard_curve(values, rates, target_rates))
        .collect()
}

/// Convert return periods (years) to annual exceedance rates.
///
/// Hazard jobs are specified in return periods at the product boundary;
/// the curve builder works in rates. Fatal on non-positive or
/// non-finite periods.
#[must_use]
pub fn rates_from_return_periods(return_periods: &[f64]) -> Vec<f64> {
    return_periods
        .iter()
        .map(|&p| {
            assert!(
                p.is_finite() && p > 0.0,
                "return period must be finite and positive, got {p}"
            );
            1.0 / p
        })
        .collect()
}

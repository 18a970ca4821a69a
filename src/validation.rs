// SPDX-License-Identifier: AGPL-3.0-only

//! Validation harness for psha-core binaries.
//!
//! Every validation binary follows the same pattern:
//!   - Hardcoded expected values with provenance
//!   - Explicit pass/fail checks against documented tolerances
//!   - Exit code 0 (all checks pass) or 1 (any check fails)
//!   - Machine-readable summary on stdout
//!
//! This module provides the shared infrastructure.

use std::process;

/// A single validation check with result tracking.
#[derive(Debug, Clone)]
pub struct Check {
    /// Human-readable label
    pub label: String,
    /// Whether this check passed
    pub passed: bool,
    /// Observed value
    pub observed: f64,
    /// Expected value
    pub expected: f64,
    /// Tolerance used
    pub tolerance: f64,
    /// How the tolerance was applied
    pub mode: ToleranceMode,
}

/// How a tolerance threshold is applied.
#[derive(Debug, Clone, Copy)]
pub enum ToleranceMode {
    /// |observed - expected| < tolerance
    Absolute,
    /// observed == expected, bit-for-bit (structural invariants)
    Exact,
    /// boolean pass/fail
    Boolean,
}

impl std::fmt::Display for ToleranceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute => write!(f, "abs"),
            Self::Exact => write!(f, "exact"),
            Self::Boolean => write!(f, "bool"),
        }
    }
}

/// Accumulates validation checks and produces a summary with exit code.
#[derive(Debug, Default)]
#[must_use]
pub struct ValidationHarness {
    /// Name of the validation binary
    pub name: String,
    /// All checks performed
    pub checks: Vec<Check>,
}

impl ValidationHarness {
    /// Create a new harness for a named validation binary.
    #[must_use = "validation harness must be used to run checks"]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            checks: Vec::new(),
        }
    }

    /// Add an absolute tolerance check: |observed - expected| < tolerance
    pub fn check_abs(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        let passed = (observed - expected).abs() < tolerance;
        self.checks.push(Check {
            label: label.to_string(),
            passed,
            observed,
            expected,
            tolerance,
            mode: ToleranceMode::Absolute,
        });
    }

    /// Add an exact check: observed == expected with no tolerance.
    ///
    /// For structural invariants that hold by construction (zeroed slots,
    /// sentinel returns), where any deviation is a logic error.
    pub fn check_exact(&mut self, label: &str, observed: f64, expected: f64) {
        self.checks.push(Check {
            label: label.to_string(),
            passed: observed == expected,
            observed,
            expected,
            tolerance: 0.0,
            mode: ToleranceMode::Exact,
        });
    }

    /// Add a boolean pass/fail check.
    pub fn check_bool(&mut self, label: &str, passed: bool) {
        self.checks.push(Check {
            label: label.to_string(),
            passed,
            observed: f64::from(u8::from(passed)),
            expected: 1.0,
            tolerance: 0.0,
            mode: ToleranceMode::Boolean,
        });
    }

    /// Number of checks that passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Total number of checks.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.checks.len()
    }

    /// Whether all checks passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Print summary and exit with appropriate code.
    ///
    /// Exit 0 if all checks pass, exit 1 if any fails.
    pub fn finish(&self) -> ! {
        println!();
        println!(
            "═══ {} validation: {}/{} checks passed ═══",
            self.name,
            self.passed_count(),
            self.total_count()
        );

        for check in &self.checks {
            let icon = if check.passed { "✓" } else { "✗" };
            println!(
                "  {icon} {}: observed={:.6e}, expected={:.6e}, tol={:.2e} ({})",
                check.label, check.observed, check.expected, check.tolerance, check.mode
            );
        }

        if self.all_passed() {
            println!("ALL CHECKS PASSED");
            process::exit(0);
        } else {
            let failed: Vec<&str> = self
                .checks
                .iter()
                .filter(|c| !c.passed)
                .map(|c| c.label.as_str())
                .collect();
            println!("FAILED CHECKS: {}", failed.join(", "));
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_check_within_tolerance_passes() {
        let mut h = ValidationHarness::new("test");
        h.check_abs("close", 1.0000001, 1.0, 1e-5);
        assert!(h.all_passed());
        assert_eq!(h.passed_count(), 1);
    }

    #[test]
    fn abs_check_outside_tolerance_fails() {
        let mut h = ValidationHarness::new("test");
        h.check_abs("far", 1.1, 1.0, 1e-5);
        assert!(!h.all_passed());
    }

    #[test]
    fn exact_check_requires_equality() {
        let mut h = ValidationHarness::new("test");
        h.check_exact("zero residual", 0.0, 0.0);
        h.check_exact("tiny residual", 1e-300, 0.0);
        assert_eq!(h.passed_count(), 1, "any non-zero residual fails exact");
        assert_eq!(h.total_count(), 2);
    }

    #[test]
    fn bool_check_tracks_flag() {
        let mut h = ValidationHarness::new("test");
        h.check_bool("ok", true);
        h.check_bool("not ok", false);
        assert_eq!(h.passed_count(), 1);
    }
}

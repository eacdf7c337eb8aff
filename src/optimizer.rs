//! Black-box minimization of the dispatch objective.

mod nelder_mead;

use std::fmt::{Display, Formatter};

use bon::Builder;
use serde::Serialize;

pub use self::nelder_mead::NelderMead;
use crate::ops::RangeInclusive;

/// Allowed range of a single decision variable.
pub type Bounds = RangeInclusive<f64>;

/// Keeps the sum of the leading `n_terms` decision variables within `target ± tolerance`.
///
/// With the battery charge power as the decision, this pins the net energy stored over the horizon.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct SumConstraint {
    pub n_terms: usize,
    pub target: f64,
    pub tolerance: f64,
}

impl SumConstraint {
    pub const DEFAULT_TOLERANCE: f64 = 0.1;

    /// Constrain the sum of the leading `values.len()` variables around the sum of the values.
    pub fn around(values: &[f64], tolerance: f64) -> Self {
        Self { n_terms: values.len(), target: values.iter().sum(), tolerance }
    }

    pub const fn range(self) -> RangeInclusive<f64> {
        RangeInclusive::new(self.target - self.tolerance, self.target + self.tolerance)
    }
}

/// Minimization problem as seen by a [`Minimizer`].
#[must_use]
#[derive(Builder)]
pub struct Problem<'a> {
    objective: &'a (dyn Fn(&[f64]) -> f64 + Sync),
    initial_guess: &'a [f64],
    bounds: Option<&'a [Bounds]>,
    sum_constraint: Option<SumConstraint>,
}

impl Problem<'_> {
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.initial_guess.len()
    }

    #[must_use]
    pub const fn initial_guess(&self) -> &[f64] {
        self.initial_guess
    }

    /// Bounds of the single variable, if bounded.
    #[must_use]
    pub fn variable_bounds(&self, index: usize) -> Option<Bounds> {
        self.bounds.map(|bounds| bounds[index])
    }

    #[must_use]
    pub fn objective(&self, x: &[f64]) -> f64 {
        (self.objective)(x)
    }

    /// Sum of squared distances to the feasible region, zero when feasible.
    ///
    /// The bound excess is measured on the raw vector, while the sum constraint
    /// applies to the clamped one, which is the vector actually priced.
    #[must_use]
    pub fn violation(&self, x: &[f64]) -> f64 {
        let bounds_violation = self.bounds.map_or(0.0, |bounds| {
            bounds.iter().zip(x).map(|(bounds, x)| bounds.excess(*x).powi(2)).sum()
        });
        let constraint_violation = self.sum_constraint.map_or(0.0, |constraint| {
            let sum = self.clamp(x).into_iter().take(constraint.n_terms).sum();
            constraint.range().excess(sum).powi(2)
        });
        bounds_violation + constraint_violation
    }

    /// Bring the vector into the box bounds, if any.
    #[must_use]
    pub fn clamp(&self, x: &[f64]) -> Vec<f64> {
        match self.bounds {
            Some(bounds) => bounds.iter().zip(x).map(|(bounds, x)| bounds.clamp(*x)).collect(),
            None => x.to_vec(),
        }
    }
}

/// Generic minimizer of a numeric objective.
pub trait Minimizer {
    fn minimize(&self, problem: &Problem<'_>) -> OptimizationResult;
}

/// Reason the search stopped.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Termination {
    Converged,
    MaxEvaluations,
    MaxIterations,
}

impl Termination {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Converged => 0,
            Self::MaxEvaluations => 1,
            Self::MaxIterations => 2,
        }
    }
}

impl Display for Termination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Converged => write!(f, "Optimization terminated successfully."),
            Self::MaxEvaluations => {
                write!(f, "Maximum number of function evaluations has been exceeded.")
            }
            Self::MaxIterations => write!(f, "Maximum number of iterations has been exceeded."),
        }
    }
}

/// Outcome of a single minimizer invocation.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct OptimizationResult {
    #[serde(rename = "success")]
    pub converged: bool,

    #[serde(rename = "elapsed_s")]
    pub elapsed_seconds: f64,

    pub evaluations: usize,
    pub iterations: usize,
    pub status: u8,
    pub message: String,

    /// Best vector found, even when the search did not converge.
    #[serde(rename = "optimum_kws")]
    pub optimum: Vec<f64>,

    #[serde(rename = "energy_cost")]
    pub objective_value: f64,
}

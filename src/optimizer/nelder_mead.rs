use std::time::Instant;

use bon::Builder;
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::{
    optimizer::{Bounds, Minimizer, OptimizationResult, Problem, Termination},
    prelude::*,
};

/// Downhill simplex search.
///
/// Bounds and the sum constraint are enforced by quadratic penalties,
/// the returned optimum is then clamped into the bounds.
#[must_use]
#[derive(Copy, Clone, Debug, Builder)]
pub struct NelderMead {
    #[builder(default = 20_000)]
    max_iterations: usize,

    #[builder(default = 100_000)]
    max_evaluations: usize,

    /// Stop when the objective values of the simplex are within this distance…
    #[builder(default = 1e-8)]
    objective_tolerance: f64,

    /// …and its vertices are within this distance from the best one.
    #[builder(default = 1e-6)]
    simplex_tolerance: f64,

    /// Coefficient of the squared constraint violation.
    #[builder(default = 1e6)]
    penalty: f64,

    /// Initial simplex step relative to the initial guess component.
    #[builder(default = 0.05)]
    relative_step: f64,

    /// Initial simplex step for zero components of the initial guess.
    #[builder(default = 0.25)]
    absolute_step: f64,

    /// Scale the coefficients with the dimension, which helps on longer horizons.
    #[builder(default = false)]
    adaptive: bool,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Minimizer for NelderMead {
    #[instrument(skip_all, fields(dimension = problem.dimension()))]
    fn minimize(&self, problem: &Problem<'_>) -> OptimizationResult {
        let start_time = Instant::now();
        let mut search = Search::new(problem, self.penalty, self.max_evaluations);
        debug!(n_free = search.free.len(), "searching…");
        let coefficients = if self.adaptive {
            Coefficients::adaptive(search.free.len())
        } else {
            Coefficients::STANDARD
        };
        let mut simplex = self.initial_simplex(&mut search);
        let mut n_iterations = 0;

        let termination = loop {
            simplex.sort_by_key(|vertex| OrderedFloat(vertex.value));
            if self.has_converged(&simplex) {
                break Termination::Converged;
            }
            if n_iterations >= self.max_iterations {
                break Termination::MaxIterations;
            }
            if search.is_exhausted() {
                break Termination::MaxEvaluations;
            }
            n_iterations += 1;
            coefficients.step(&mut simplex, &mut search);
        };

        let best = &simplex[0];
        let optimum = problem.clamp(&search.expand(&best.point));
        let objective_value = best.objective;
        let n_evaluations = search.n_evaluations;
        let elapsed = start_time.elapsed();
        if termination == Termination::Converged {
            info!(n_iterations, n_evaluations, objective_value, ?elapsed, "converged");
        } else {
            warn!(n_iterations, n_evaluations, objective_value, ?elapsed, "not converged: {termination}");
        }
        OptimizationResult {
            converged: termination == Termination::Converged,
            elapsed_seconds: elapsed.as_secs_f64(),
            evaluations: n_evaluations,
            iterations: n_iterations,
            status: termination.code(),
            message: termination.to_string(),
            optimum,
            objective_value,
        }
    }
}

impl NelderMead {
    /// Start from the clamped initial guess and step along each free variable.
    fn initial_simplex(&self, search: &mut Search<'_, '_>) -> Vec<Vertex> {
        let origin: Vec<f64> = search.free.iter().map(|&index| search.template[index]).collect();
        let points: Vec<Vec<f64>> = search
            .free
            .iter()
            .enumerate()
            .map(|(i, &index)| {
                let mut point = origin.clone();
                point[i] += self.initial_step(origin[i], search.problem.variable_bounds(index));
                point
            })
            .collect();
        let mut simplex = Vec::with_capacity(points.len() + 1);
        simplex.push(search.evaluate(origin));
        simplex.extend(points.into_iter().map(|point| search.evaluate(point)));
        simplex
    }

    /// Step away from the value, turning back when the upper bound is too close.
    fn initial_step(&self, value: f64, bounds: Option<Bounds>) -> f64 {
        let step = if value == 0.0 { self.absolute_step } else { self.relative_step * value.abs() };
        let Some(bounds) = bounds else {
            return step;
        };
        let headroom = bounds.max - value;
        let footroom = value - bounds.min;
        if headroom >= step {
            step
        } else if footroom >= step {
            -step
        } else if headroom >= footroom {
            headroom
        } else {
            -footroom
        }
    }

    /// Expects the simplex to be sorted.
    fn has_converged(&self, simplex: &[Vertex]) -> bool {
        let best = &simplex[0];
        let value_spread =
            simplex.iter().map(|vertex| (vertex.value - best.value).abs()).fold(0.0, f64::max);
        let size = simplex
            .iter()
            .flat_map(|vertex| vertex.point.iter().zip(&best.point).map(|(x, b)| (x - b).abs()))
            .fold(0.0, f64::max);
        value_spread <= self.objective_tolerance && size <= self.simplex_tolerance
    }
}

/// Penalized objective over the free variables, with the evaluation budget.
///
/// Variables with zero-width bounds are frozen at their bound and never enter the simplex.
struct Search<'p, 'a> {
    problem: &'p Problem<'a>,
    penalty: f64,

    /// Initial guess clamped into the bounds, supplies the frozen variables.
    template: Vec<f64>,

    /// Indices of the variables the simplex moves along.
    free: Vec<usize>,

    max_evaluations: usize,
    n_evaluations: usize,
}

impl<'p, 'a> Search<'p, 'a> {
    fn new(problem: &'p Problem<'a>, penalty: f64, max_evaluations: usize) -> Self {
        let free = (0..problem.dimension())
            .filter(|&index| {
                problem.variable_bounds(index).is_none_or(|bounds| bounds.width() > 0.0)
            })
            .collect();
        Self {
            problem,
            penalty,
            template: problem.clamp(problem.initial_guess()),
            free,
            max_evaluations: max_evaluations.max(1),
            n_evaluations: 0,
        }
    }

    const fn is_exhausted(&self) -> bool {
        self.n_evaluations >= self.max_evaluations
    }

    /// Full decision vector with the free variables taken from the point.
    fn expand(&self, point: &[f64]) -> Vec<f64> {
        let mut x = self.template.clone();
        for (&index, value) in self.free.iter().zip_eq(point) {
            x[index] = *value;
        }
        x
    }

    /// Price the point clamped into the bounds and penalize the raw point for leaving them.
    ///
    /// Once the budget is spent, the point is rejected without calling the objective.
    fn evaluate(&mut self, point: Vec<f64>) -> Vertex {
        if self.is_exhausted() {
            return Vertex { point, objective: f64::INFINITY, value: f64::INFINITY };
        }
        self.n_evaluations += 1;
        let x = self.expand(&point);
        let objective = self.problem.objective(&self.problem.clamp(&x));
        let value = self.penalty.mul_add(self.problem.violation(&x), objective);
        Vertex { point, objective, value }
    }
}

#[derive(Clone)]
struct Vertex {
    /// Free variables only.
    point: Vec<f64>,

    /// Objective at the clamped point.
    objective: f64,

    /// Objective plus the penalty.
    value: f64,
}

#[derive(Copy, Clone)]
struct Coefficients {
    reflection: f64,
    expansion: f64,
    contraction: f64,
    shrink: f64,
}

impl Coefficients {
    const STANDARD: Self = Self { reflection: 1.0, expansion: 2.0, contraction: 0.5, shrink: 0.5 };

    #[expect(clippy::cast_precision_loss)]
    fn adaptive(dimension: usize) -> Self {
        let n = dimension.max(2) as f64;
        Self {
            reflection: 1.0,
            expansion: 1.0 + 2.0 / n,
            contraction: 0.75 - 1.0 / (2.0 * n),
            shrink: 1.0 - 1.0 / n,
        }
    }

    /// Replace the worst vertex, or shrink the simplex towards the best one.
    ///
    /// Expects the simplex to be sorted.
    fn step(self, simplex: &mut [Vertex], search: &mut Search<'_, '_>) {
        let n = simplex.len() - 1;
        let worst = simplex[n].clone();
        let centroid = centroid(&simplex[..n]);

        let reflected = search.evaluate(towards(&centroid, &worst.point, -self.reflection));
        if reflected.value < simplex[0].value {
            let expanded = search.evaluate(towards(&centroid, &worst.point, -self.expansion));
            simplex[n] = if expanded.value < reflected.value { expanded } else { reflected };
            return;
        }
        if reflected.value < simplex[n.saturating_sub(1)].value {
            simplex[n] = reflected;
            return;
        }

        // Outside contraction when the reflection is at least better than the worst vertex:
        let coefficient =
            if reflected.value < worst.value { -self.contraction } else { self.contraction };
        let contracted = search.evaluate(towards(&centroid, &worst.point, coefficient));
        if contracted.value < worst.value.min(reflected.value) {
            simplex[n] = contracted;
            return;
        }

        let best = simplex[0].point.clone();
        for vertex in &mut simplex[1..] {
            *vertex = search.evaluate(towards(&best, &vertex.point, self.shrink));
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn centroid(vertices: &[Vertex]) -> Vec<f64> {
    let n = vertices.len() as f64;
    let dimension = vertices[0].point.len();
    (0..dimension).map(|i| vertices.iter().map(|vertex| vertex.point[i]).sum::<f64>() / n).collect()
}

/// `origin + coefficient × (target - origin)`.
fn towards(origin: &[f64], target: &[f64], coefficient: f64) -> Vec<f64> {
    origin.iter().zip_eq(target).map(|(o, t)| coefficient.mul_add(t - o, *o)).collect()
}

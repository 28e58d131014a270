//! Local search invoked from the basket.
//!
//! The engine only depends on the [`LocalSearch`] trait. [`CoordinateSearch`]
//! is the default: a deterministic bounded compass search. [`NoLocalSearch`]
//! hands the starting point back untouched.

use crate::objective::Evaluator;

/// Result of a local search.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMinimum {
    pub x: Vec<f64>,
    pub f: f64,
}

/// Budgeted view of the objective handed to a local search.
///
/// Every evaluation is counted by the run's evaluator and folded into the
/// global best. Once the per-search budget is spent or a termination
/// predicate fires, [`LocalProblem::evaluate`] returns `None`.
pub struct LocalProblem<'a> {
    eval: &'a mut Evaluator,
    lower: &'a [f64],
    upper: &'a [f64],
    budget: usize,
    used: usize,
    stopped: bool,
}

impl<'a> LocalProblem<'a> {
    pub fn new(eval: &'a mut Evaluator, lower: &'a [f64], upper: &'a [f64], budget: usize) -> Self {
        let stopped = eval.check().is_err();
        Self {
            eval,
            lower,
            upper,
            budget,
            used: 0,
            stopped,
        }
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        self.lower
    }

    pub fn upper(&self) -> &[f64] {
        self.upper
    }

    /// Evaluations used by this search.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Evaluations left for this search.
    pub fn remaining(&self) -> usize {
        if self.stopped {
            0
        } else {
            self.budget.saturating_sub(self.used)
        }
    }

    /// True once a termination predicate of the run fired.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Clamp `x` into the bounds.
    pub fn project(&self, x: &mut [f64]) {
        for (i, xi) in x.iter_mut().enumerate() {
            *xi = xi.clamp(self.lower[i], self.upper[i]);
        }
    }

    /// Evaluate the objective at `x`, or `None` when no evaluation is left.
    pub fn evaluate(&mut self, x: &[f64]) -> Option<f64> {
        if self.remaining() == 0 {
            return None;
        }
        self.used += 1;
        let f = self.eval.evaluate(x);
        self.eval.improve(x, f);
        if self.eval.check().is_err() {
            self.stopped = true;
        }
        Some(f)
    }
}

/// A local minimizer started from basket points.
pub trait LocalSearch: Send {
    /// Refine `start` (with value `f_start`) inside the problem's bounds.
    fn search(&mut self, problem: &mut LocalProblem<'_>, start: &[f64], f_start: f64) -> LocalMinimum;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Bounded compass search.
///
/// Probes `x ± step` along each coordinate in turn and moves on the first
/// improvement. After a pass without improvement all steps are halved. Stops
/// when every step is below `min_step · max(|x_i|, 1)` or the budget is spent.
#[derive(Debug, Clone)]
pub struct CoordinateSearch {
    /// Initial step as a fraction of the box width.
    pub step_fraction: f64,
    /// Relative step size at which the search stops.
    pub min_step: f64,
}

impl Default for CoordinateSearch {
    fn default() -> Self {
        Self {
            step_fraction: 0.1,
            min_step: 1e-8,
        }
    }
}

impl LocalSearch for CoordinateSearch {
    fn search(&mut self, problem: &mut LocalProblem<'_>, start: &[f64], f_start: f64) -> LocalMinimum {
        let n = start.len();
        let mut x = start.to_vec();
        let mut f = f_start;
        let mut step: Vec<f64> = (0..n)
            .map(|i| {
                let width = problem.upper()[i] - problem.lower()[i];
                if width.is_finite() {
                    self.step_fraction * width
                } else {
                    self.step_fraction * x[i].abs().max(1.0)
                }
            })
            .collect();

        'search: loop {
            let mut improved = false;
            for i in 0..n {
                for dir in [1.0, -1.0] {
                    let c = (x[i] + dir * step[i]).clamp(problem.lower()[i], problem.upper()[i]);
                    if c == x[i] {
                        continue;
                    }
                    let mut candidate = x.clone();
                    candidate[i] = c;
                    let Some(fc) = problem.evaluate(&candidate) else {
                        break 'search;
                    };
                    if fc < f {
                        x = candidate;
                        f = fc;
                        improved = true;
                        break;
                    }
                }
            }
            if !improved {
                let mut converged = true;
                for i in 0..n {
                    step[i] *= 0.5;
                    if step[i] > self.min_step * x[i].abs().max(1.0) {
                        converged = false;
                    }
                }
                if converged {
                    break;
                }
            }
        }
        LocalMinimum { x, f }
    }

    fn name(&self) -> &'static str {
        "coordinate"
    }
}

/// Local search that returns its starting point.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalSearch;

impl LocalSearch for NoLocalSearch {
    fn search(&mut self, _problem: &mut LocalProblem<'_>, start: &[f64], f_start: f64) -> LocalMinimum {
        LocalMinimum {
            x: start.to_vec(),
            f: f_start,
        }
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::McsOptions;
    use std::sync::Arc;

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    fn evaluator(max_feval: usize) -> Evaluator {
        let opts = McsOptions {
            max_feval,
            ..Default::default()
        };
        Evaluator::new(Arc::new(sphere), &opts, 2)
    }

    #[test]
    fn test_coordinate_search_converges() {
        let mut ev = evaluator(10_000);
        let lower = [-5.0, -5.0];
        let upper = [5.0, 5.0];
        let mut problem = LocalProblem::new(&mut ev, &lower, &upper, 500);
        let start = [3.0, -2.0];
        let result = CoordinateSearch::default().search(&mut problem, &start, sphere(&start));
        assert!(result.f < 1e-12, "f = {}", result.f);
        let used = problem.used();
        assert!(used <= 500);
        assert_eq!(ev.nfev, used);
        assert_eq!(ev.best_f, result.f);
    }

    #[test]
    fn test_coordinate_search_respects_bounds() {
        let mut ev = evaluator(10_000);
        let lower = [1.0, 2.0];
        let upper = [4.0, 3.0];
        let mut problem = LocalProblem::new(&mut ev, &lower, &upper, 500);
        let start = [3.5, 2.5];
        let result = CoordinateSearch::default().search(&mut problem, &start, sphere(&start));
        assert_eq!(result.x, vec![1.0, 2.0]);
        assert_eq!(result.f, 5.0);
    }

    #[test]
    fn test_budget_is_enforced() {
        let mut ev = evaluator(10_000);
        let lower = [-5.0, -5.0];
        let upper = [5.0, 5.0];
        let mut problem = LocalProblem::new(&mut ev, &lower, &upper, 3);
        let start = [3.0, -2.0];
        let result = CoordinateSearch::default().search(&mut problem, &start, sphere(&start));
        assert_eq!(problem.used(), 3);
        assert_eq!(problem.remaining(), 0);
        assert_eq!(problem.evaluate(&[0.0, 0.0]), None);
        assert!(result.f < sphere(&start));
        assert_eq!(ev.nfev, 3);
    }

    #[test]
    fn test_run_termination_stops_search() {
        let mut ev = evaluator(2);
        let lower = [-5.0, -5.0];
        let upper = [5.0, 5.0];
        let mut problem = LocalProblem::new(&mut ev, &lower, &upper, 100);
        let start = [3.0, -2.0];
        CoordinateSearch::default().search(&mut problem, &start, sphere(&start));
        assert!(problem.is_stopped());
        assert_eq!(ev.nfev, 2);
    }

    #[test]
    fn test_no_local_search() {
        let mut ev = evaluator(10);
        let lower = [-1.0, -1.0];
        let upper = [1.0, 1.0];
        let mut problem = LocalProblem::new(&mut ev, &lower, &upper, 10);
        let result = NoLocalSearch.search(&mut problem, &[0.5, 0.5], 0.5);
        assert_eq!(result, LocalMinimum { x: vec![0.5, 0.5], f: 0.5 });
        assert_eq!(ev.nfev, 0);
    }

    #[test]
    fn test_project() {
        let mut ev = evaluator(10);
        let lower = [-1.0, 0.0];
        let upper = [1.0, 2.0];
        let problem = LocalProblem::new(&mut ev, &lower, &upper, 10);
        let mut x = [3.0, -1.0];
        problem.project(&mut x);
        assert_eq!(x, [1.0, 0.0]);
    }
}

//! Counted objective evaluation, global best tracking and the per-evaluation
//! termination predicates.

use std::sync::Arc;
use std::time::Instant;

use crate::error::{McsReturnCode, Step};
use crate::types::{McsOptions, ObjectiveFn};

/// Wraps the objective with an evaluation counter and the running best point.
///
/// Every evaluation site in the engine calls [`Evaluator::evaluate`], folds the
/// value into the best with [`Evaluator::improve`] where appropriate, and then
/// polls [`Evaluator::check`].
pub struct Evaluator {
    func: Arc<ObjectiveFn>,
    /// Evaluations performed so far.
    pub nfev: usize,
    /// Best point found so far (empty until the first improvement).
    pub best_x: Vec<f64>,
    /// Best value found so far.
    pub best_f: f64,
    /// Sweep counter maintained by the orchestrator.
    pub sweep: usize,
    /// Sweep during which `best_f` last decreased.
    pub best_sweep: usize,
    max_feval: usize,
    max_time: f64,
    threshold: Option<f64>,
    start: Instant,
}

impl Evaluator {
    /// Create an evaluator with the budgets from `options` resolved for `dim`.
    pub fn new(func: Arc<ObjectiveFn>, options: &McsOptions, dim: usize) -> Self {
        Self {
            func,
            nfev: 0,
            best_x: Vec::new(),
            best_f: f64::INFINITY,
            sweep: 0,
            best_sweep: 0,
            max_feval: options.resolved_max_feval(dim),
            max_time: options.max_time,
            threshold: options.fglobal_threshold(),
            start: Instant::now(),
        }
    }

    /// Evaluate the objective at `x`. Non-finite values are mapped to `+∞`.
    pub fn evaluate(&mut self, x: &[f64]) -> f64 {
        self.nfev += 1;
        let f = (self.func)(x);
        if f.is_finite() {
            f
        } else {
            f64::INFINITY
        }
    }

    /// Replace the best point when `f` is strictly better. Returns true on improvement.
    pub fn improve(&mut self, x: &[f64], f: f64) -> bool {
        if f < self.best_f || self.best_x.is_empty() {
            let improved = f < self.best_f;
            self.best_f = f;
            self.best_x.clear();
            self.best_x.extend_from_slice(x);
            if improved {
                self.best_sweep = self.sweep;
            }
            improved
        } else {
            false
        }
    }

    /// The termination predicates polled after every evaluation.
    ///
    /// `Err(GlobalFound)` once the acceptable value is reached, otherwise
    /// `Err(MaxFevalExceeded)` / `Err(MaxTimeExceeded)` once a budget is spent.
    pub fn check(&self) -> Step {
        if let Some(threshold) = self.threshold {
            if self.best_f <= threshold {
                return Err(McsReturnCode::GlobalFound);
            }
        }
        if self.max_feval > 0 && self.nfev >= self.max_feval {
            return Err(McsReturnCode::MaxFevalExceeded);
        }
        if self.max_time > 0.0 && self.start.elapsed().as_secs_f64() >= self.max_time {
            return Err(McsReturnCode::MaxTimeExceeded);
        }
        Ok(())
    }

    /// Evaluations left before the budget is spent.
    pub fn remaining(&self) -> usize {
        self.max_feval.saturating_sub(self.nfev)
    }

    /// Seconds elapsed since the evaluator was created.
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

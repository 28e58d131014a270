//! MCS orchestrator: the sweep loop, split execution and basket processing.
//!
//! One run proceeds as
//!
//! 1. sample the initialization list and seed the box repository,
//! 2. sweep: take the best box of each level in increasing level order,
//!    reconstruct its vertices, decide and execute a split or promote it,
//! 3. when the maximum level is reached, process the basket with the local
//!    search and start the next sweep,
//!
//! until a termination predicate fires or no active box remains.

use std::sync::Arc;

use tracing::{debug, info};

use crate::basket::{Basket, BasketEntry};
use crate::error::{McsError, McsReturnCode, Result, Step};
use crate::init::InitList;
use crate::local::{CoordinateSearch, LocalProblem, LocalSearch};
use crate::objective::Evaluator;
use crate::split::{self, SplitDecision, SplitTarget};
use crate::storage::{BoxId, BoxStorage, ChildRole, RegularChild, Split};
use crate::sweep::SweepRecord;
use crate::trace::TraceWriter;
use crate::trace_write;
use crate::types::{Bounds, CallbackFn, McsOptions, McsResult, ObjectiveFn};
use crate::vertex::{self, Vertices};

/// Multilevel Coordinate Search optimizer.
///
/// After [`Mcs::minimize`] returns, the box repository, sweep record, basket
/// and initialization table of the run stay available for inspection.
pub struct Mcs {
    func: Arc<ObjectiveFn>,

    /// Number of dimensions.
    pub dim: usize,

    /// Lower bounds.
    pub lower: Vec<f64>,

    /// Upper bounds.
    pub upper: Vec<f64>,

    /// Optimizer options.
    pub options: McsOptions,

    /// Resolved maximum level (`smax`).
    pub max_levels: usize,

    /// Initialization table.
    pub init: InitList,

    /// Box repository.
    pub storage: BoxStorage,

    /// Best active box per level.
    pub record: SweepRecord,

    /// Local-search basket.
    pub basket: Basket,

    /// Sweeps started.
    pub nsweep: usize,

    /// Local searches performed.
    pub nlocal: usize,

    /// Function evaluations of the last run.
    pub nfev: usize,

    /// Best point of the last run.
    pub xbest: Vec<f64>,

    /// Best value of the last run.
    pub fbest: f64,

    local_search: Box<dyn LocalSearch>,
    callback: Option<Arc<CallbackFn>>,
    tracer: Option<Arc<TraceWriter>>,
}

impl Mcs {
    /// Create a new optimizer.
    ///
    /// # Arguments
    /// * `func` - Objective function
    /// * `bounds` - Lower and upper bounds for each dimension
    /// * `options` - Optimizer configuration
    ///
    /// # Errors
    /// Any [`McsError`] describing an unusable configuration. No objective
    /// evaluation happens here.
    pub fn new(
        func: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
        bounds: &Bounds,
        options: McsOptions,
    ) -> Result<Self> {
        let dim = bounds.len();
        if dim == 0 {
            return Err(McsError::InvalidArgs("bounds must not be empty".into()));
        }
        let max_levels = options.resolved_max_levels(dim);
        if max_levels == 0 {
            return Err(McsError::InvalidMaxLevels(max_levels));
        }
        if options.max_time.is_nan() || options.max_time < 0.0 {
            return Err(McsError::InvalidArgs(format!(
                "max_time must be non-negative, got {}",
                options.max_time
            )));
        }
        let lower: Vec<f64> = bounds.iter().map(|b| b.0).collect();
        let upper: Vec<f64> = bounds.iter().map(|b| b.1).collect();
        let init = InitList::build(&lower, &upper, &options)?;

        Ok(Self {
            func: Arc::new(func),
            dim,
            lower,
            upper,
            options,
            max_levels,
            init,
            storage: BoxStorage::new(),
            record: SweepRecord::new(max_levels),
            basket: Basket::new(),
            nsweep: 0,
            nlocal: 0,
            nfev: 0,
            xbest: Vec::new(),
            fbest: f64::INFINITY,
            local_search: Box::new(CoordinateSearch::default()),
            callback: None,
            tracer: None,
        })
    }

    /// Replace the local search started from basket points.
    pub fn with_local_search(mut self, local_search: impl LocalSearch + 'static) -> Self {
        self.local_search = Box::new(local_search);
        self
    }

    pub fn with_boxed_local_search(mut self, local_search: Box<dyn LocalSearch>) -> Self {
        self.local_search = local_search;
        self
    }

    /// Set a callback invoked after every sweep. Returning `true` stops the run.
    pub fn with_callback(
        mut self,
        callback: impl Fn(&[f64], f64, usize, usize) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Attach a trace writer (only written to with the `trace` feature).
    pub fn with_tracer(mut self, tracer: Arc<TraceWriter>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Run the optimization.
    pub fn minimize(&mut self) -> Result<McsResult> {
        self.reset()?;
        let mut eval = Evaluator::new(Arc::clone(&self.func), &self.options, self.dim);
        info!(
            dim = self.dim,
            population_size = self.options.population_size,
            max_levels = self.max_levels,
            max_feval = self.options.resolved_max_feval(self.dim),
            init_list = %self.options.init_list,
            local_search = self.local_search.name(),
            "starting MCS"
        );

        let code = self.run(&mut eval).unwrap_or_else(|code| code);

        self.nfev = eval.nfev;
        self.xbest = eval.best_x.clone();
        self.fbest = eval.best_f;
        info!(
            fbest = self.fbest,
            nfev = self.nfev,
            nsweep = self.nsweep,
            nboxes = self.storage.len(),
            nlocal = self.nlocal,
            elapsed = eval.elapsed(),
            return_code = ?code,
            "MCS finished"
        );
        Ok(McsResult::new(
            self.xbest.clone(),
            self.fbest,
            self.nfev,
            self.nsweep,
            self.storage.len(),
            self.nlocal,
            code,
        ))
    }

    fn reset(&mut self) -> Result<()> {
        self.init = InitList::build(&self.lower, &self.upper, &self.options)?;
        self.storage = BoxStorage::new();
        self.record = SweepRecord::new(self.max_levels);
        self.basket = Basket::new();
        self.nsweep = 0;
        self.nlocal = 0;
        Ok(())
    }

    // ──────────────────────────────────────────────────────────────────────
    // Sweep loop
    // ──────────────────────────────────────────────────────────────────────

    fn run(&mut self, eval: &mut Evaluator) -> Step<McsReturnCode> {
        let smax = self.max_levels;
        self.init.evaluate(eval)?;
        self.init.seed_boxes(&mut self.storage);
        trace_write!(
            self.tracer,
            "TRACE INIT nfev={} fbest={:.15e} nboxes={} ranking={:?}",
            eval.nfev,
            eval.best_f,
            self.storage.len(),
            self.init.ranking
        );
        self.deposit_overdeep();

        self.nsweep = 1;
        eval.sweep = 1;
        let mut s = self.record.start_sweep(&self.storage);
        self.trace_sweep(eval, s);

        while s < smax {
            if let Some(par) = self.record.take(s) {
                self.process_box(eval, par, s)?;
            }
            s = self.record.next_level(s, smax);
            if s == smax {
                self.process_basket(eval)?;
                if let Some(code) = self.check_after_sweep(eval) {
                    return Ok(code);
                }
                s = self.record.start_sweep(&self.storage);
                self.nsweep += 1;
                eval.sweep = self.nsweep;
                self.trace_sweep(eval, s);
            }
        }
        self.process_basket(eval)?;
        Ok(McsReturnCode::Exhausted)
    }

    fn trace_sweep(&self, eval: &Evaluator, level: usize) {
        debug!(
            nsweep = self.nsweep,
            level,
            fbest = eval.best_f,
            nfev = eval.nfev,
            "sweep started"
        );
        trace_write!(
            self.tracer,
            "TRACE SWEEP n={} level={} fbest={:.15e} nfev={}",
            self.nsweep,
            level,
            eval.best_f,
            eval.nfev
        );
    }

    /// Predicates polled once per completed sweep.
    fn check_after_sweep(&self, eval: &Evaluator) -> Option<McsReturnCode> {
        if let Some(ref cb) = self.callback {
            if cb(&eval.best_x, eval.best_f, eval.nfev, self.nsweep) {
                return Some(McsReturnCode::ForcedStop);
            }
        }
        let stale = self.options.max_stale_sweeps;
        if stale > 0 && self.nsweep.saturating_sub(eval.best_sweep) >= stale {
            return Some(McsReturnCode::StaleSweeps);
        }
        None
    }

    /// Hand seeded boxes that already sit at or beyond the maximum level to
    /// the basket.
    fn deposit_overdeep(&mut self) {
        let smax = self.max_levels;
        let deep: Vec<BoxId> = self
            .storage
            .iter()
            .filter(|(_, b)| b.level >= smax)
            .map(|(id, _)| id)
            .collect();
        for id in deep {
            let v = vertex::reconstruct(&self.storage, &self.init, id);
            let f = self.storage.get(id).f[0];
            self.storage.get_mut(id).level = 0;
            self.basket.deposit(v.x, f);
        }
    }

    /// Treat the recorded box `par` of level `s`.
    fn process_box(&mut self, eval: &mut Evaluator, par: BoxId, s: usize) -> Step {
        let v = vertex::reconstruct(&self.storage, &self.init, par);
        let (f, no_gain) = {
            let b = self.storage.get(par);
            (b.f[0], b.no_gain)
        };
        trace_write!(
            self.tracer,
            "TRACE SELECT box={} level={} f={:.15e} n0min={}",
            par.index(),
            s,
            f,
            v.min_splits()
        );

        let decision = split::decide(&v, &self.init, s, f, no_gain, eval.best_f);
        let kind = match decision {
            SplitDecision::ByRank { .. } => "rank",
            SplitDecision::ByGain { .. } => "gain",
            SplitDecision::NoGain | SplitDecision::NoSplit => "none",
        };
        debug!(box_id = par.index(), level = s, f, kind, ?decision, "split decision");

        match decision.split() {
            Some((dim, SplitTarget::InitList)) => {
                trace_write!(
                    self.tracer,
                    "TRACE SPLIT box={} kind={} dim={} at=list",
                    par.index(),
                    kind,
                    dim
                );
                self.split_by_init_list(eval, par, dim, s, &v)
            }
            Some((dim, SplitTarget::At(z))) => {
                trace_write!(
                    self.tracer,
                    "TRACE SPLIT box={} kind={} dim={} at={:.15e}",
                    par.index(),
                    kind,
                    dim,
                    z
                );
                self.split_at(eval, par, dim, z, s, &v)
            }
            None => {
                trace_write!(
                    self.tracer,
                    "TRACE SPLIT box={} kind={} dim=- at=-",
                    par.index(),
                    kind
                );
                if decision == SplitDecision::NoGain {
                    self.storage.get_mut(par).no_gain = true;
                }
                if s + 1 < self.max_levels {
                    self.storage.get_mut(par).level = s + 1;
                    self.record.update(par, &self.storage);
                } else {
                    self.storage.get_mut(par).level = 0;
                    self.basket.deposit(v.x, f);
                }
                Ok(())
            }
        }
    }

    // ──────────────────────────────────────────────────────────────────────
    // Split execution
    // ──────────────────────────────────────────────────────────────────────

    fn spawn(&mut self, parent: BoxId, level: usize, role: ChildRole, f: f64) -> BoxId {
        let id = self.storage.create(Some(parent), level, role, f);
        self.record.update(id, &self.storage);
        id
    }

    /// Regular split of `par` along `dim` between its base coordinate and `z2`.
    ///
    /// The child holding the worse of the two values goes one level deeper.
    /// A third box covers the part toward the opposite vertex.
    fn split_at(
        &mut self,
        eval: &mut Evaluator,
        par: BoxId,
        dim: usize,
        z2: f64,
        s: usize,
        v: &Vertices,
    ) -> Step {
        let smax = self.max_levels;
        let z1 = v.x[dim];
        self.storage.mark_split(par, Split::Regular { dim });
        self.storage.get_mut(par).z = [z1, z2];

        let mut x = v.x.clone();
        x[dim] = z2;
        let f2 = eval.evaluate(&x);
        self.storage.get_mut(par).f[1] = f2;
        eval.improve(&x, f2);
        eval.check()?;
        let f1 = self.storage.get(par).f[0];

        if s + 1 >= smax {
            x[dim] = z1;
            self.basket.deposit(x.clone(), f1);
            x[dim] = z2;
            self.basket.deposit(x, f2);
            return Ok(());
        }

        let first = ChildRole::Regular(RegularChild::First);
        let second = ChildRole::Regular(RegularChild::Second);
        if f1 <= f2 {
            self.spawn(par, s + 1, first, f1);
            if s + 2 < smax {
                self.spawn(par, s + 2, second, f2);
            } else {
                x[dim] = z2;
                self.basket.deposit(x.clone(), f2);
            }
        } else {
            if s + 2 < smax {
                self.spawn(par, s + 2, first, f1);
            } else {
                x[dim] = z1;
                self.basket.deposit(x.clone(), f1);
            }
            self.spawn(par, s + 1, second, f2);
        }

        let y = v.y[dim];
        if z2 != y {
            let third = ChildRole::Regular(RegularChild::Third);
            if (z2 - y).abs() > (z2 - z1).abs() * (3.0 - 5f64.sqrt()) * 0.5 {
                self.spawn(par, s + 1, third, f2);
            } else if s + 2 < smax {
                self.spawn(par, s + 2, third, f2);
            } else {
                x[dim] = z2;
                self.basket.deposit(x, f2);
            }
        }
        Ok(())
    }

    /// Split `par` along `dim` over the whole initialization list.
    ///
    /// Evaluates every candidate except the starting one, stores the values
    /// as a new table column and fans out like the seeding does.
    fn split_by_init_list(
        &mut self,
        eval: &mut Evaluator,
        par: BoxId,
        dim: usize,
        s: usize,
        v: &Vertices,
    ) -> Step {
        let smax = self.max_levels;
        let l = self.init.population_size();
        let column = self.init.push_column();
        self.storage.mark_split(par, Split::InitList { dim, column });

        let base = self.storage.get(par).f[0];
        let start = self.init.initial[dim];
        let mut x = v.x.clone();
        for j in 0..l {
            if j == start {
                self.init.values[column][j] = base;
                continue;
            }
            x[dim] = self.init.coords[dim][j];
            let f = eval.evaluate(&x);
            self.init.values[column][j] = f;
            eval.improve(&x, f);
            eval.check()?;
        }

        let f0 = self.init.values[column].clone();
        let x0 = self.init.coords[dim].clone();
        if s + 1 >= smax {
            for j in 0..l {
                x[dim] = x0[j];
                self.basket.deposit(x.clone(), f0[j]);
            }
            return Ok(());
        }

        let mut ordinal = 0;
        if self.init.has_lower_box(dim) {
            ordinal += 1;
            self.spawn(par, s + 1, ChildRole::InitList { ordinal }, f0[0]);
        }
        for j in 0..l - 1 {
            ordinal += 1;
            if f0[j] <= f0[j + 1] || s + 2 < smax {
                let level = if f0[j] <= f0[j + 1] { s + 1 } else { s + 2 };
                self.spawn(par, level, ChildRole::InitList { ordinal }, f0[j]);
            } else {
                x[dim] = x0[j];
                self.basket.deposit(x.clone(), f0[j]);
            }
            ordinal += 1;
            if f0[j + 1] < f0[j] || s + 2 < smax {
                let level = if f0[j + 1] < f0[j] { s + 1 } else { s + 2 };
                self.spawn(par, level, ChildRole::InitList { ordinal }, f0[j + 1]);
            } else {
                x[dim] = x0[j + 1];
                self.basket.deposit(x.clone(), f0[j + 1]);
            }
        }
        if self.init.has_upper_box(dim) {
            ordinal += 1;
            self.spawn(par, s + 1, ChildRole::InitList { ordinal }, f0[l - 1]);
        }
        Ok(())
    }

    // ──────────────────────────────────────────────────────────────────────
    // Basket processing
    // ──────────────────────────────────────────────────────────────────────

    /// Screen the pending basket points, best first, and refine the
    /// survivors with the local search.
    fn process_basket(&mut self, eval: &mut Evaluator) -> Step {
        if self.options.local_search_steps == 0 || self.basket.pending.is_empty() {
            return Ok(());
        }
        let mut pending = std::mem::take(&mut self.basket.pending);
        pending.sort_by(|a, b| a.f.total_cmp(&b.f));
        debug!(pending = pending.len(), minima = self.basket.minima.len(), "processing basket");

        for BasketEntry { mut x, mut f } in pending {
            if !self.basket.check_location_not_used(&x) {
                trace_write!(self.tracer, "TRACE BASKET x={:?} f={:.15e} action=skip", x, f);
                continue;
            }
            self.basket.add_location(&x);
            let nbasket = self.basket.minima.len();
            if self
                .basket
                .point_inside_domain_of_attraction(eval, &mut x, &mut f, nbasket)?
            {
                trace_write!(self.tracer, "TRACE BASKET x={:?} f={:.15e} action=merged", x, f);
                continue;
            }
            trace_write!(self.tracer, "TRACE BASKET x={:?} f={:.15e} action=search", x, f);

            let nfev_before = eval.nfev;
            let local = {
                let mut problem = LocalProblem::new(
                    eval,
                    &self.lower,
                    &self.upper,
                    self.options.local_search_steps,
                );
                self.local_search.search(&mut problem, &x, f)
            };
            self.nlocal += 1;
            eval.improve(&local.x, local.f);
            trace_write!(
                self.tracer,
                "TRACE LOCAL start_f={:.15e} f={:.15e} nfev={}",
                f,
                local.f,
                eval.nfev - nfev_before
            );
            debug!(start_f = f, f = local.f, nfev = eval.nfev - nfev_before, "local search");

            if let Err(code) = eval.check() {
                self.basket.add_minimum(BasketEntry::new(local.x, local.f));
                return Err(code);
            }
            let nbasket = self.basket.minima.len();
            if !self
                .basket
                .candidate_inside_domain_of_attraction(eval, &local.x, local.f, nbasket)?
            {
                self.basket.add_minimum(BasketEntry::new(local.x, local.f));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::NoLocalSearch;
    use crate::types::InitListStrategy;

    fn shifted(x: &[f64]) -> f64 {
        (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2)
    }

    fn bounds2() -> Bounds {
        vec![(-5.0, 5.0), (-5.0, 5.0)]
    }

    #[test]
    fn test_new_rejects_invalid_configuration() {
        let opts = McsOptions {
            max_levels: Some(0),
            ..Default::default()
        };
        assert_eq!(
            Mcs::new(shifted, &bounds2(), opts).err(),
            Some(McsError::InvalidMaxLevels(0))
        );
        assert!(matches!(
            Mcs::new(shifted, &vec![], McsOptions::default()),
            Err(McsError::InvalidArgs(_))
        ));
        let opts = McsOptions {
            max_time: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Mcs::new(shifted, &bounds2(), opts),
            Err(McsError::InvalidArgs(_))
        ));
        assert_eq!(
            Mcs::new(shifted, &vec![(1.0, 0.0)], McsOptions::default()).err(),
            Some(McsError::InvalidBounds { dim: 0 })
        );
    }

    #[test]
    fn test_new_does_not_evaluate() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let mcs = Mcs::new(
            move |x: &[f64]| {
                c.fetch_add(1, Ordering::SeqCst);
                x[0]
            },
            &vec![(0.0, 1.0)],
            McsOptions::default(),
        )
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(mcs.max_levels, 60);
    }

    #[test]
    fn test_minimize_shifted_quadratic() {
        let opts = McsOptions {
            max_levels: Some(20),
            max_feval: 300,
            ..Default::default()
        };
        let mut mcs = Mcs::new(shifted, &bounds2(), opts)
            .unwrap()
            .with_local_search(NoLocalSearch);
        let result = mcs.minimize().unwrap();
        assert!(result.success);
        assert!(result.fun < 5.0, "fun = {}", result.fun);
        assert!(result.nfev <= 300);
        assert_eq!(result.nboxes, mcs.storage.len());
        assert_eq!(shifted(&result.x), result.fun);
    }

    #[test]
    fn test_max_levels_one_deposits_seeded_boxes() {
        let opts = McsOptions {
            max_levels: Some(1),
            local_search_steps: 0,
            ..Default::default()
        };
        let mut mcs = Mcs::new(shifted, &bounds2(), opts).unwrap();
        let result = mcs.minimize().unwrap();
        assert_eq!(result.return_code, McsReturnCode::Exhausted);
        assert_eq!(result.nfev, 5);
        assert_eq!(mcs.storage.len(), 9);
        assert_eq!(mcs.storage.active_count(), 0);
        assert_eq!(mcs.basket.pending.len(), 7);
        assert!(mcs
            .storage
            .iter()
            .all(|(_, b)| !matches!(b.split, Some(Split::Regular { .. }))));
        for entry in &mcs.basket.pending {
            assert_eq!(shifted(&entry.x), entry.f);
        }
    }

    #[test]
    fn test_regular_split_children_carry_evaluated_values() {
        let opts = McsOptions {
            max_levels: Some(20),
            max_feval: 200,
            local_search_steps: 0,
            ..Default::default()
        };
        let mut mcs = Mcs::new(shifted, &bounds2(), opts).unwrap();
        mcs.minimize().unwrap();
        let mut regular = 0;
        for (id, b) in mcs.storage.iter() {
            if let Some(Split::Regular { dim }) = b.split {
                regular += 1;
                for (_, child) in mcs.storage.children(id) {
                    match child.role {
                        ChildRole::Regular(RegularChild::First) => assert_eq!(child.f[0], b.f[0]),
                        ChildRole::Regular(_) => assert_eq!(child.f[0], b.f[1]),
                        other => panic!("unexpected child role {:?}", other),
                    }
                }
                let v = vertex::reconstruct(&mcs.storage, &mcs.init, id);
                let mut x = v.x.clone();
                assert_eq!(x[dim], b.z[0]);
                x[dim] = b.z[1];
                assert_eq!(shifted(&x), b.f[1]);
            }
        }
        assert!(regular > 0);
    }

    #[test]
    fn test_record_points_at_best_box_of_level() {
        let opts = McsOptions {
            max_levels: Some(15),
            max_feval: 150,
            local_search_steps: 0,
            ..Default::default()
        };
        let mut mcs = Mcs::new(shifted, &bounds2(), opts).unwrap();
        mcs.minimize().unwrap();
        for level in 1..mcs.record.len() {
            if let Some(id) = mcs.record.get(level) {
                let b = mcs.storage.get(id);
                assert_eq!(b.level, level);
                for (_, other) in mcs.storage.iter().filter(|(_, o)| o.level == level) {
                    assert!(b.f[0] <= other.f[0]);
                }
            }
        }
    }

    #[test]
    fn test_budget_is_respected_exactly() {
        for budget in [1, 2, 7, 33, 120] {
            let opts = McsOptions {
                max_feval: budget,
                ..Default::default()
            };
            let mut mcs = Mcs::new(shifted, &bounds2(), opts).unwrap();
            let result = mcs.minimize().unwrap();
            assert_eq!(result.return_code, McsReturnCode::MaxFevalExceeded);
            assert_eq!(result.nfev, budget);
        }
    }

    #[test]
    fn test_callback_force_stop() {
        let mut mcs = Mcs::new(shifted, &bounds2(), McsOptions::default())
            .unwrap()
            .with_callback(|_x, _f, _nfev, nsweep| nsweep >= 2);
        let result = mcs.minimize().unwrap();
        assert_eq!(result.return_code, McsReturnCode::ForcedStop);
        assert!(!result.success);
        assert_eq!(result.nsweep, 2);
    }

    #[test]
    fn test_minimize_twice_is_reproducible() {
        let opts = McsOptions {
            max_feval: 150,
            init_list: InitListStrategy::Interior,
            ..Default::default()
        };
        let mut mcs = Mcs::new(shifted, &bounds2(), opts).unwrap();
        let a = mcs.minimize().unwrap();
        let boxes_a: Vec<_> = mcs.storage.iter().map(|(_, b)| b.clone()).collect();
        let b = mcs.minimize().unwrap();
        let boxes_b: Vec<_> = mcs.storage.iter().map(|(_, b)| b.clone()).collect();
        assert_eq!(a.x, b.x);
        assert_eq!(a.fun, b.fun);
        assert_eq!(a.nfev, b.nfev);
        assert_eq!(boxes_a, boxes_b);
    }
}

//! Fluent configuration of an MCS run.

use std::sync::Arc;

use crate::error::Result;
use crate::local::LocalSearch;
use crate::mcs::Mcs;
use crate::types::{Bounds, CallbackFn, InitListStrategy, McsOptions, McsResult};

/// Builder over [`McsOptions`] for a given objective and bounds.
///
/// ```no_run
/// use mcs::McsBuilder;
///
/// let result = McsBuilder::new(|x: &[f64]| x[0] * x[0] + x[1] * x[1], vec![(-5.0, 5.0); 2])
///     .max_feval(500)
///     .max_levels(30)
///     .minimize()
///     .unwrap();
/// assert!(result.fun < 1e-3);
/// ```
pub struct McsBuilder<F> {
    func: F,
    bounds: Bounds,
    options: McsOptions,
    local_search: Option<Box<dyn LocalSearch>>,
    callback: Option<Arc<CallbackFn>>,
}

impl<F> McsBuilder<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
{
    pub fn new(func: F, bounds: Bounds) -> Self {
        Self {
            func,
            bounds,
            options: McsOptions::default(),
            local_search: None,
            callback: None,
        }
    }

    /// Replace all options at once.
    pub fn options(mut self, options: McsOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of initialization-list candidates per dimension (at least 3).
    pub fn population_size(mut self, v: usize) -> Self {
        self.options.population_size = v;
        self
    }

    /// Maximum box level `smax`.
    pub fn max_levels(mut self, v: usize) -> Self {
        self.options.max_levels = Some(v);
        self
    }

    pub fn max_feval(mut self, v: usize) -> Self {
        self.options.max_feval = v;
        self
    }

    /// Wall-clock budget in seconds.
    pub fn max_time(mut self, v: f64) -> Self {
        self.options.max_time = v;
        self
    }

    /// Stop as soon as this value is reached.
    pub fn fglobal(mut self, v: f64) -> Self {
        self.options.fglobal = v;
        self
    }

    pub fn fglobal_reltol(mut self, v: f64) -> Self {
        self.options.fglobal_reltol = v;
        self
    }

    /// Stop after this many sweeps without improvement.
    pub fn max_stale_sweeps(mut self, v: usize) -> Self {
        self.options.max_stale_sweeps = v;
        self
    }

    /// Per-candidate local-search budget; 0 disables basket processing.
    pub fn local_search_steps(mut self, v: usize) -> Self {
        self.options.local_search_steps = v;
        self
    }

    pub fn init_list(mut self, v: InitListStrategy) -> Self {
        self.options.init_list = v;
        self
    }

    pub fn initial_index(mut self, v: Vec<usize>) -> Self {
        self.options.initial_index = Some(v);
        self
    }

    pub fn local_search(mut self, v: impl LocalSearch + 'static) -> Self {
        self.local_search = Some(Box::new(v));
        self
    }

    /// Per-sweep callback; returning `true` stops the run.
    pub fn callback(
        mut self,
        v: impl Fn(&[f64], f64, usize, usize) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.callback = Some(Arc::new(v));
        self
    }

    /// Validate the configuration and create the optimizer.
    pub fn build(self) -> Result<Mcs> {
        let mut mcs = Mcs::new(self.func, &self.bounds, self.options)?;
        if let Some(local_search) = self.local_search {
            mcs = mcs.with_boxed_local_search(local_search);
        }
        if let Some(cb) = self.callback {
            mcs = mcs.with_callback(move |x, f, nfev, nsweep| cb(x, f, nfev, nsweep));
        }
        Ok(mcs)
    }

    /// Build and run.
    pub fn minimize(self) -> Result<McsResult> {
        self.build()?.minimize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{McsError, McsReturnCode};
    use crate::local::NoLocalSearch;

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    #[test]
    fn test_setters_reach_options() {
        let mcs = McsBuilder::new(sphere, vec![(-1.0, 2.0); 3])
            .population_size(5)
            .max_levels(12)
            .max_feval(77)
            .max_time(3.5)
            .fglobal(-1.0)
            .fglobal_reltol(0.1)
            .max_stale_sweeps(4)
            .local_search_steps(9)
            .init_list(InitListStrategy::Interior)
            .initial_index(vec![0, 2, 4])
            .build()
            .unwrap();
        assert_eq!(mcs.options.population_size, 5);
        assert_eq!(mcs.max_levels, 12);
        assert_eq!(mcs.options.max_feval, 77);
        assert_eq!(mcs.options.max_time, 3.5);
        assert_eq!(mcs.options.fglobal, -1.0);
        assert_eq!(mcs.options.fglobal_reltol, 0.1);
        assert_eq!(mcs.options.max_stale_sweeps, 4);
        assert_eq!(mcs.options.local_search_steps, 9);
        assert_eq!(mcs.options.init_list, InitListStrategy::Interior);
        assert_eq!(mcs.init.initial, vec![0, 2, 4]);
    }

    #[test]
    fn test_build_propagates_errors() {
        let err = McsBuilder::new(sphere, vec![(0.0, 1.0)])
            .population_size(2)
            .build()
            .err();
        assert_eq!(err, Some(McsError::InvalidPopulationSize(2)));
    }

    #[test]
    fn test_callback_and_local_search_are_installed() {
        let result = McsBuilder::new(sphere, vec![(-3.0, 2.0); 2])
            .max_feval(10_000)
            .max_levels(8)
            .local_search(NoLocalSearch)
            .callback(|_x, _f, _nfev, nsweep| nsweep >= 1)
            .minimize()
            .unwrap();
        assert_eq!(result.return_code, McsReturnCode::ForcedStop);
        assert_eq!(result.nsweep, 1);
    }
}

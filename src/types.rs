//! Core type definitions for the MCS implementation.
//!
//! Options, initialization-list strategies, objective/callback signatures and
//! the result structure returned by a run.

use std::fmt;

use crate::error::McsReturnCode;

// ──────────────────────────────────────────────────────────────────────────────
// Type Aliases
// ──────────────────────────────────────────────────────────────────────────────

/// Bounds for each dimension: `Vec<(lower, upper)>`.
pub type Bounds = Vec<(f64, f64)>;

/// Objective function signature.
///
/// - `x`: current point (dimension n)
/// - Returns: function value. `NaN` and infinities are treated as `+∞`.
pub type ObjectiveFn = dyn Fn(&[f64]) -> f64 + Send + Sync;

/// Callback function for progress monitoring and early stopping.
///
/// Called after each completed sweep with the current best point and value.
/// - `x`: current best point
/// - `fun`: current best function value
/// - `nfev`: total function evaluations so far
/// - `nsweep`: sweeps completed so far
/// - Returns: `true` to force stop, `false` to continue
pub type CallbackFn = dyn Fn(&[f64], f64, usize, usize) -> bool + Send + Sync;

// ──────────────────────────────────────────────────────────────────────────────
// Initialization Lists
// ──────────────────────────────────────────────────────────────────────────────

/// How the per-dimension candidate coordinates of the initialization list are chosen.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InitListStrategy {
    /// `L` equally spaced candidates from lower to upper bound inclusive.
    /// For `L = 3` this is `[u, (u+v)/2, v]`. Requires finite bounds.
    #[default]
    Bounds,

    /// `L` candidates at the cell midpoints `u + (2k+1)(v-u)/(2L)`.
    /// Neither bound is a candidate, so both boundary boxes are created.
    /// Requires finite bounds.
    Interior,

    /// Three candidates chosen with the safeguarded subinterval rule.
    /// Accepts infinite bounds; requires a population size of 3.
    Safeguarded,

    /// User-supplied candidates, one strictly increasing list of length `L`
    /// per dimension, every entry finite and inside the bounds.
    Custom(Vec<Vec<f64>>),
}

impl InitListStrategy {
    /// Short name used in logs and trace output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bounds => "bounds",
            Self::Interior => "interior",
            Self::Safeguarded => "safeguarded",
            Self::Custom(_) => "custom",
        }
    }

    /// Whether the strategy can place candidates in an unbounded dimension.
    pub fn allows_infinite_bounds(&self) -> bool {
        matches!(self, Self::Safeguarded | Self::Custom(_))
    }
}

impl fmt::Display for InitListStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Options
// ──────────────────────────────────────────────────────────────────────────────

/// Sentinel for an unknown global minimum.
pub const MCS_UNKNOWN_FGLOBAL: f64 = f64::NEG_INFINITY;

/// Default relative tolerance for fglobal (0.0 means exact match required).
pub const MCS_UNKNOWN_FGLOBAL_RELTOL: f64 = 0.0;

/// Default number of candidates per dimension.
pub const DEFAULT_POPULATION_SIZE: usize = 3;

/// Default local-search budget per basket candidate.
pub const DEFAULT_LOCAL_SEARCH_STEPS: usize = 50;

/// Configuration options for the MCS optimizer.
#[derive(Debug, Clone)]
pub struct McsOptions {
    /// Number of candidate coordinates per dimension in the initialization
    /// list (`L`). Must be at least 3.
    pub population_size: usize,

    /// Maximum box level (`smax`). Boxes that would reach this level are
    /// deposited into the basket instead. `None` selects `50·n + 10`.
    pub max_levels: Option<usize>,

    /// Maximum number of function evaluations. 0 selects `50·n²`.
    pub max_feval: usize,

    /// Maximum wall-clock time in seconds. 0.0 means no limit.
    pub max_time: f64,

    /// Known global minimum value. Set to `MCS_UNKNOWN_FGLOBAL` if unknown.
    /// When known, optimization stops when `f <= fglobal + fglobal_reltol * |fglobal|`.
    pub fglobal: f64,

    /// Relative tolerance for the global minimum test.
    pub fglobal_reltol: f64,

    /// Stop after this many consecutive sweeps without improving the best
    /// value. 0 disables the test.
    pub max_stale_sweeps: usize,

    /// Evaluation budget handed to the local search for each basket
    /// candidate. 0 disables basket processing entirely.
    pub local_search_steps: usize,

    /// Initialization-list strategy.
    pub init_list: InitListStrategy,

    /// Index of the starting candidate in every dimension.
    /// `None` selects `population_size / 2` everywhere.
    pub initial_index: Option<Vec<usize>>,
}

impl Default for McsOptions {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            max_levels: None,
            max_feval: 0,
            max_time: 0.0,
            fglobal: MCS_UNKNOWN_FGLOBAL,
            fglobal_reltol: MCS_UNKNOWN_FGLOBAL_RELTOL,
            max_stale_sweeps: 0,
            local_search_steps: DEFAULT_LOCAL_SEARCH_STEPS,
            init_list: InitListStrategy::default(),
            initial_index: None,
        }
    }
}

impl McsOptions {
    /// The effective maximum level for an `n`-dimensional problem.
    pub fn resolved_max_levels(&self, n: usize) -> usize {
        self.max_levels.unwrap_or(50 * n + 10)
    }

    /// The effective evaluation budget for an `n`-dimensional problem.
    pub fn resolved_max_feval(&self, n: usize) -> usize {
        if self.max_feval == 0 {
            50 * n * n
        } else {
            self.max_feval
        }
    }

    /// The effective starting indices for an `n`-dimensional problem.
    pub fn resolved_initial_index(&self, n: usize) -> Vec<usize> {
        match &self.initial_index {
            Some(l) => l.clone(),
            None => vec![self.population_size / 2; n],
        }
    }

    /// The acceptable-value threshold, if a global minimum is known.
    pub fn fglobal_threshold(&self) -> Option<f64> {
        if self.fglobal == MCS_UNKNOWN_FGLOBAL {
            return None;
        }
        Some(if self.fglobal == 0.0 {
            self.fglobal_reltol
        } else {
            self.fglobal + self.fglobal_reltol * self.fglobal.abs()
        })
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Result
// ──────────────────────────────────────────────────────────────────────────────

/// Result of an MCS optimization run.
#[derive(Debug, Clone)]
pub struct McsResult {
    /// Best point found (dimension n).
    pub x: Vec<f64>,

    /// Best function value found.
    pub fun: f64,

    /// Total number of function evaluations.
    pub nfev: usize,

    /// Number of sweeps started.
    pub nsweep: usize,

    /// Number of boxes created.
    pub nboxes: usize,

    /// Number of local searches performed.
    pub nlocal: usize,

    /// Whether the optimization terminated successfully.
    pub success: bool,

    /// The return code indicating why optimization stopped.
    pub return_code: McsReturnCode,

    /// Human-readable message describing the termination reason.
    pub message: String,
}

impl McsResult {
    /// Create a new result from optimization output.
    pub fn new(
        x: Vec<f64>,
        fun: f64,
        nfev: usize,
        nsweep: usize,
        nboxes: usize,
        nlocal: usize,
        return_code: McsReturnCode,
    ) -> Self {
        let success = return_code.is_success();
        let message = format!("{}", return_code);
        Self {
            x,
            fun,
            nfev,
            nsweep,
            nboxes,
            nlocal,
            success,
            return_code,
            message,
        }
    }
}

impl fmt::Display for McsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "McsResult {{")?;
        writeln!(f, "  success: {}", self.success)?;
        writeln!(f, "  message: {}", self.message)?;
        writeln!(f, "  fun: {:.15e}", self.fun)?;
        write!(f, "  x: [")?;
        for (i, xi) in self.x.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.15e}", xi)?;
        }
        writeln!(f, "]")?;
        writeln!(f, "  nfev: {}", self.nfev)?;
        writeln!(f, "  nsweep: {}", self.nsweep)?;
        writeln!(f, "  nboxes: {}", self.nboxes)?;
        writeln!(f, "  nlocal: {}", self.nlocal)?;
        writeln!(f, "  return_code: {:?}", self.return_code)?;
        write!(f, "}}")
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Display for McsReturnCode
// ──────────────────────────────────────────────────────────────────────────────

impl fmt::Display for McsReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds => write!(f, "Invalid bounds: lower >= upper"),
            Self::DimensionMismatch => write!(f, "Dimension mismatch"),
            Self::InvalidPopulationSize => write!(f, "Population size must be at least 3"),
            Self::InvalidMaxLevels => write!(f, "Maximum level must be positive"),
            Self::InvalidInitList => write!(f, "Invalid initialization list"),
            Self::InvalidArgs => write!(f, "Invalid arguments"),
            Self::ForcedStop => write!(f, "Optimization forced to stop"),
            Self::MaxFevalExceeded => write!(f, "Maximum function evaluations reached"),
            Self::GlobalFound => write!(f, "Global minimum found within tolerance"),
            Self::StaleSweeps => write!(f, "No improvement over the allowed number of sweeps"),
            Self::Exhausted => write!(f, "No box left below the maximum level"),
            Self::MaxTimeExceeded => write!(f, "Maximum time exceeded"),
        }
    }
}

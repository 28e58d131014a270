//! # MCS-RS: Multilevel Coordinate Search in Rust
//!
//! A Rust-native implementation of Huyer and Neumaier's Multilevel Coordinate
//! Search, a deterministic derivative-free global minimizer for
//! bound-constrained problems.
//!
//! ## Overview
//!
//! MCS partitions the search box into sub-boxes, each owning one evaluated
//! base point. Boxes carry a level that grows with the number of times they
//! were split. The engine repeatedly sweeps over the levels, splitting the
//! best box of each level either
//!
//! - **by rank**: along the least-split coordinate once a box is deep enough,
//! - **by expected gain**: along the coordinate where a separable quadratic
//!   model through the known values predicts the largest decrease.
//!
//! Boxes reaching the maximum level hand their base point to a *basket*,
//! where a local search refines them after each sweep and duplicate basins of
//! attraction are merged.
//!
//! ```no_run
//! use mcs::{minimize, McsOptions};
//!
//! let f = |x: &[f64]| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2);
//! let bounds = vec![(-5.0, 5.0), (-5.0, 5.0)];
//! let result = minimize(f, &bounds, McsOptions::default()).unwrap();
//! println!("{}", result);
//! ```
//!
//! ## Modules
//!
//! - [`init`]: initialization list and seeding of the box tree
//! - [`vertex`]: reconstruction of a box's base and opposite vertex
//! - [`split`]: split decision by rank or expected gain
//! - [`sweep`]: best box per level
//! - [`basket`]: local-search candidates and known minima
//! - [`local`]: pluggable local search
//! - [`mcs`]: the orchestrating engine
//!
//! ## References
//!
//! - Huyer, W. & Neumaier, A. "Global optimization by multilevel coordinate
//!   search." Journal of Global Optimization 14, 331–355 (1999).

pub mod basket;
pub mod builder;
pub mod error;
pub mod init;
pub mod local;
pub mod mcs;
pub mod objective;
pub mod quadratic;
pub mod split;
pub mod storage;
pub mod sweep;
pub mod trace;
pub mod types;
pub mod vertex;

// Re-export main types
pub use builder::McsBuilder;
pub use error::{McsError, McsReturnCode, Result};
pub use local::{CoordinateSearch, LocalMinimum, LocalProblem, LocalSearch, NoLocalSearch};
pub use mcs::Mcs;
pub use trace::TraceWriter;
pub use types::{
    Bounds, CallbackFn, InitListStrategy, McsOptions, McsResult, ObjectiveFn,
    MCS_UNKNOWN_FGLOBAL, MCS_UNKNOWN_FGLOBAL_RELTOL,
};

/// Minimize `func` over `bounds` with the default local search.
///
/// # Errors
/// Returns an [`McsError`] when the configuration is unusable.
pub fn minimize(
    func: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    bounds: &Bounds,
    options: McsOptions,
) -> Result<McsResult> {
    Mcs::new(func, bounds, options)?.minimize()
}

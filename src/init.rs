//! Initialization engine.
//!
//! Builds the per-dimension candidate lists, samples the objective along
//! them one dimension at a time and seeds the box repository with one fan-out
//! of sibling boxes per dimension.
//!
//! # Table layout
//!
//! | field         | shape       | meaning                                              |
//! |---------------|-------------|------------------------------------------------------|
//! | `coords`      | `[n][L]`    | candidate coordinates, strictly increasing per dim   |
//! | `values`      | `[col][L]`  | objective values, one column per fan-out performed   |
//! | `initial`     | `[n]`       | index of the starting candidate                      |
//! | `best`        | `[n]`       | index of the best candidate after the first pass     |
//! | `ranking`     | `[n]`       | dimensions ordered by decreasing estimated variability |
//! | `far_vertex`  | `[n]`       | bound farthest from the starting coordinate          |
//!
//! Columns `0..n` are filled by [`InitList::evaluate`]; column `i` belongs to
//! dimension `i`. Later initialization-list splits append further columns.

use tracing::debug;

use crate::error::{McsError, Result, Step};
use crate::objective::Evaluator;
use crate::quadratic::{subint, Quadratic};
use crate::storage::{BoxId, BoxStorage, ChildRole, Split};
use crate::types::{InitListStrategy, McsOptions};

/// Initialization table.
#[derive(Debug, Clone)]
pub struct InitList {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub coords: Vec<Vec<f64>>,
    pub values: Vec<Vec<f64>>,
    pub initial: Vec<usize>,
    pub best: Vec<usize>,
    pub ranking: Vec<usize>,
    pub far_vertex: Vec<f64>,
}

impl InitList {
    /// Validate the configuration and lay out the candidate coordinates.
    ///
    /// No objective evaluation happens here.
    pub fn build(lower: &[f64], upper: &[f64], options: &McsOptions) -> Result<Self> {
        let n = lower.len();
        if upper.len() != n {
            return Err(McsError::DimensionMismatch {
                expected: n,
                found: upper.len(),
            });
        }
        if n == 0 {
            return Err(McsError::InvalidArgs("dimension must be at least 1".into()));
        }
        let l = options.population_size;
        if l < 3 {
            return Err(McsError::InvalidPopulationSize(l));
        }
        let finite_only = !options.init_list.allows_infinite_bounds();
        for i in 0..n {
            let (u, v) = (lower[i], upper[i]);
            if u.is_nan() || v.is_nan() || u >= v {
                return Err(McsError::InvalidBounds { dim: i });
            }
            if finite_only && (!u.is_finite() || !v.is_finite()) {
                return Err(McsError::InvalidBounds { dim: i });
            }
        }

        let coords = match &options.init_list {
            InitListStrategy::Bounds => (0..n)
                .map(|i| bounds_list(lower[i], upper[i], l))
                .collect(),
            InitListStrategy::Interior => (0..n)
                .map(|i| interior_list(lower[i], upper[i], l))
                .collect(),
            InitListStrategy::Safeguarded => {
                if l != 3 {
                    return Err(McsError::InvalidInitList(format!(
                        "safeguarded list needs population size 3, got {}",
                        l
                    )));
                }
                (0..n)
                    .map(|i| safeguarded_list(lower[i], upper[i]).to_vec())
                    .collect()
            }
            InitListStrategy::Custom(list) => {
                validate_custom(list, lower, upper, l)?;
                list.clone()
            }
        };

        let initial = options.resolved_initial_index(n);
        if initial.len() != n {
            return Err(McsError::DimensionMismatch {
                expected: n,
                found: initial.len(),
            });
        }
        for (dim, &index) in initial.iter().enumerate() {
            if index >= l {
                return Err(McsError::InvalidInitialIndex { dim, index });
            }
        }

        let far_vertex = (0..n)
            .map(|i| {
                let x: f64 = coords[i][initial[i]];
                if (x - lower[i]).abs() > (x - upper[i]).abs() {
                    lower[i]
                } else {
                    upper[i]
                }
            })
            .collect();

        Ok(Self {
            lower: lower.to_vec(),
            upper: upper.to_vec(),
            coords,
            values: vec![vec![0.0; l]; n],
            best: initial.clone(),
            initial,
            ranking: (0..n).collect(),
            far_vertex,
        })
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// Candidates per dimension (`L`).
    pub fn population_size(&self) -> usize {
        self.coords.first().map_or(0, |c| c.len())
    }

    /// The starting point of the run.
    pub fn start_point(&self) -> Vec<f64> {
        (0..self.dim())
            .map(|i| self.coords[i][self.initial[i]])
            .collect()
    }

    /// True if the lower bound of `dim` is not itself a candidate.
    pub fn has_lower_box(&self, dim: usize) -> bool {
        self.lower[dim] < self.coords[dim][0]
    }

    /// True if the upper bound of `dim` is not itself a candidate.
    pub fn has_upper_box(&self, dim: usize) -> bool {
        let l = self.population_size();
        self.coords[dim][l - 1] < self.upper[dim]
    }

    /// Append an empty value column and return its index.
    pub fn push_column(&mut self) -> usize {
        let l = self.population_size();
        self.values.push(vec![0.0; l]);
        self.values.len() - 1
    }

    /// Sample the objective along every candidate list.
    ///
    /// Dimension `i` is scanned with all earlier coordinates fixed at their
    /// best candidate. The value at the starting candidate is reused from the
    /// previous dimension instead of being evaluated again.
    pub fn evaluate(&mut self, eval: &mut Evaluator) -> Step {
        let n = self.dim();
        let l = self.population_size();
        let mut x = self.start_point();

        let mut f_best = eval.evaluate(&x);
        self.values[0][self.initial[0]] = f_best;
        eval.improve(&x, f_best);
        eval.check()?;

        for i in 0..n {
            self.best[i] = self.initial[i];
            for j in 0..l {
                if j == self.initial[i] {
                    if i > 0 {
                        self.values[i][j] = self.values[i - 1][self.best[i - 1]];
                    }
                    continue;
                }
                x[i] = self.coords[i][j];
                let f = eval.evaluate(&x);
                self.values[i][j] = f;
                eval.improve(&x, f);
                if f < f_best {
                    f_best = f;
                    self.best[i] = j;
                }
                eval.check()?;
            }
            x[i] = self.coords[i][self.best[i]];
        }
        debug!(nfev = eval.nfev, fbest = f_best, "initialization list evaluated");
        Ok(())
    }

    /// Seed `storage` with the root box and one fan-out per dimension.
    ///
    /// Dimension `i + 1` fans out from the child of dimension `i` that holds
    /// the best candidate (the side of it where the fitted quadratic is
    /// lowest). Also computes the variability ranking. Returns the root.
    pub fn seed_boxes(&mut self, storage: &mut BoxStorage) -> BoxId {
        let n = self.dim();
        let l = self.population_size();
        let root = storage.create(None, 1, ChildRole::Root, self.values[0][self.initial[0]]);
        let mut parent = root;
        let mut variability = vec![0.0; n];

        for i in 0..n {
            let x0 = &self.coords[i];
            let f0 = &self.values[i];
            let (u, v) = (self.lower[i], self.upper[i]);
            let base_level = storage.get(parent).level;
            let best = self.best[i];
            let mut ordinal = 0;
            let mut next_parent = parent;

            let lower_box = if x0[0] > u {
                ordinal += 1;
                Some(storage.create(
                    Some(parent),
                    base_level + 1,
                    ChildRole::InitList { ordinal },
                    f0[0],
                ))
            } else {
                None
            };

            let hi = if l == 3 { v } else { x0[2] };
            let q = Quadratic::interpolate([x0[0], x0[1], x0[2]], [f0[0], f0[1], f0[2]]);
            let mut xl = q.minimize_on(u, hi);
            let mut fl = q.eval(xl);
            let mut fu = q.eval(q.maximize_on(u, hi));

            let mut prev_right = None;
            for j in 0..l - 1 {
                let s = if f0[j] <= f0[j + 1] { 1 } else { 2 };
                ordinal += 1;
                let left = storage.create(
                    Some(parent),
                    base_level + s,
                    ChildRole::InitList { ordinal },
                    f0[j],
                );
                if j == 0 && best == 0 {
                    next_parent = match lower_box {
                        Some(b) if xl < x0[0] => b,
                        _ => left,
                    };
                }
                if j >= 1 {
                    if best == j {
                        next_parent = match prev_right {
                            Some(b) if xl <= x0[j] => b,
                            _ => left,
                        };
                    }
                    if j + 3 <= l {
                        let q = Quadratic::interpolate(
                            [x0[j], x0[j + 1], x0[j + 2]],
                            [f0[j], f0[j + 1], f0[j + 2]],
                        );
                        let hi = if j + 3 < l { x0[j + 2] } else { v };
                        xl = q.minimize_on(x0[j], hi);
                        fl = fl.min(q.eval(xl));
                        fu = fu.max(q.eval(q.maximize_on(x0[j], hi)));
                    }
                }
                ordinal += 1;
                prev_right = Some(storage.create(
                    Some(parent),
                    base_level + 3 - s,
                    ChildRole::InitList { ordinal },
                    f0[j + 1],
                ));
            }

            let upper_box = if x0[l - 1] < v {
                ordinal += 1;
                Some(storage.create(
                    Some(parent),
                    base_level + 1,
                    ChildRole::InitList { ordinal },
                    f0[l - 1],
                ))
            } else {
                None
            };
            if best == l - 1 {
                next_parent = match (upper_box, prev_right) {
                    (Some(b), Some(r)) => {
                        if xl <= x0[l - 1] {
                            r
                        } else {
                            b
                        }
                    }
                    (_, Some(r)) => r,
                    (Some(b), None) => b,
                    (None, None) => parent,
                };
            }

            variability[i] = fu - fl;
            storage.mark_split(parent, Split::InitList { dim: i, column: i });
            parent = next_parent;
        }

        self.ranking = rank_by_variability(&variability);
        debug!(nboxes = storage.len(), ranking = ?self.ranking, "boxes seeded");
        root
    }

    /// Best point and value after the first sampling pass.
    pub fn best_point(&self) -> (Vec<f64>, f64) {
        let n = self.dim();
        let x = (0..n).map(|i| self.coords[i][self.best[i]]).collect();
        (x, self.values[n - 1][self.best[n - 1]])
    }
}

/// Dimensions ordered by decreasing variability. Ties keep the lower index;
/// NaN entries rank last.
fn rank_by_variability(variability: &[f64]) -> Vec<usize> {
    let n = variability.len();
    let mut taken = vec![false; n];
    let mut ranking = Vec::with_capacity(n);
    for _ in 0..n {
        let mut pick: Option<usize> = None;
        for i in (0..n).filter(|&i| !taken[i]) {
            pick = match pick {
                None => Some(i),
                Some(p) if variability[i] > variability[p] => Some(i),
                Some(p) if variability[p].is_nan() && !variability[i].is_nan() => Some(i),
                keep => keep,
            };
        }
        if let Some(p) = pick {
            taken[p] = true;
            ranking.push(p);
        }
    }
    ranking
}

fn bounds_list(u: f64, v: f64, l: usize) -> Vec<f64> {
    let mut x: Vec<f64> = (0..l)
        .map(|k| u + (v - u) * k as f64 / (l - 1) as f64)
        .collect();
    x[0] = u;
    x[l - 1] = v;
    x
}

fn interior_list(u: f64, v: f64, l: usize) -> Vec<f64> {
    (0..l)
        .map(|k| u + (2 * k + 1) as f64 * (v - u) / (2 * l) as f64)
        .collect()
}

fn safeguarded_list(u: f64, v: f64) -> [f64; 3] {
    if u >= 0.0 {
        let (_, hi) = subint(u, v);
        [u, 0.5 * (u + hi), hi]
    } else if v <= 0.0 {
        let (_, lo) = subint(v, u);
        [lo, 0.5 * (lo + v), v]
    } else {
        let (_, lo) = subint(0.0, u);
        let (_, hi) = subint(0.0, v);
        [lo, 0.0, hi]
    }
}

fn validate_custom(list: &[Vec<f64>], lower: &[f64], upper: &[f64], l: usize) -> Result<()> {
    if list.len() != lower.len() {
        return Err(McsError::DimensionMismatch {
            expected: lower.len(),
            found: list.len(),
        });
    }
    for (i, x) in list.iter().enumerate() {
        if x.len() != l {
            return Err(McsError::InvalidInitList(format!(
                "dimension {} has {} candidates, expected {}",
                i,
                x.len(),
                l
            )));
        }
        if x.iter().any(|c| !c.is_finite() || *c < lower[i] || *c > upper[i]) {
            return Err(McsError::InvalidInitList(format!(
                "dimension {} has a candidate outside the bounds",
                i
            )));
        }
        if x.windows(2).any(|w| w[0] >= w[1]) {
            return Err(McsError::InvalidInitList(format!(
                "dimension {} candidates are not strictly increasing",
                i
            )));
        }
    }
    Ok(())
}

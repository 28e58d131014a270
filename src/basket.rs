//! Local-search basket.
//!
//! Points that reach the maximum level wait in `pending` until the sweep
//! ends. Before a pending point is refined it is deduplicated against the
//! starting points already tried and screened against the minima found so
//! far: three collinear samples between the point and a known minimum tell
//! whether both probably sit in the same basin.

use crate::error::Step;
use crate::objective::Evaluator;

/// Growth chunk of the basket lists.
pub const BASKET_CHUNK: usize = 100;

/// A point and its objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct BasketEntry {
    pub x: Vec<f64>,
    pub f: f64,
}

impl BasketEntry {
    pub fn new(x: Vec<f64>, f: f64) -> Self {
        Self { x, f }
    }
}

/// Pending candidates, locally searched minima and tried starting points.
#[derive(Debug, Clone, Default)]
pub struct Basket {
    /// Minima returned by the local search, merged as the run goes.
    pub minima: Vec<BasketEntry>,
    /// Points deposited at the maximum level since the last basket pass.
    pub pending: Vec<BasketEntry>,
    /// Starting points already handed to the screening.
    pub tried: Vec<Vec<f64>>,
}

fn push_chunked<T>(list: &mut Vec<T>, item: T) {
    if list.len() == list.capacity() {
        list.reserve_exact(BASKET_CHUNK);
    }
    list.push(item);
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(p, q)| (p - q) * (p - q))
        .sum::<f64>()
        .sqrt()
}

/// Point `x + t·(target - x)` with `t = k/3`.
fn third(x: &[f64], target: &[f64], k: f64) -> Vec<f64> {
    x.iter()
        .zip(target)
        .map(|(a, b)| a + k * (b - a) / 3.0)
        .collect()
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a point for the next basket pass.
    pub fn deposit(&mut self, x: Vec<f64>, f: f64) {
        tracing::trace!(f, "point deposited in basket");
        push_chunked(&mut self.pending, BasketEntry::new(x, f));
    }

    /// Record a locally searched minimum.
    pub fn add_minimum(&mut self, entry: BasketEntry) {
        push_chunked(&mut self.minima, entry);
    }

    /// True if `x` was never used as a starting point (exact comparison).
    pub fn check_location_not_used(&self, x: &[f64]) -> bool {
        !self.tried.iter().any(|t| t.as_slice() == x)
    }

    /// Remember `x` as a tried starting point.
    pub fn add_location(&mut self, x: &[f64]) {
        push_chunked(&mut self.tried, x.to_vec());
    }

    /// Indices of the first `nbasket` minima, nearest to `x` first.
    fn nearest_first(&self, x: &[f64], nbasket: usize) -> Vec<usize> {
        let nbasket = nbasket.min(self.minima.len());
        let dist: Vec<f64> = self.minima[..nbasket]
            .iter()
            .map(|m| distance(x, &m.x))
            .collect();
        let mut order: Vec<usize> = (0..nbasket).collect();
        order.sort_by(|&a, &b| dist[a].total_cmp(&dist[b]));
        order
    }

    /// Screen a starting point against the known minima.
    ///
    /// For every minimum not worse than the point, samples at 1/3 and 2/3 of
    /// the way toward it decide: the point may move to a better sample and
    /// continue, or it is declared inside that minimum's domain of
    /// attraction. Returns `Ok(true)` in the latter case. `x` and `f` hold the
    /// possibly moved point afterwards.
    pub fn point_inside_domain_of_attraction(
        &mut self,
        eval: &mut Evaluator,
        x: &mut Vec<f64>,
        f: &mut f64,
        nbasket: usize,
    ) -> Step<bool> {
        for i in self.nearest_first(x, nbasket) {
            let fmi = self.minima[i].f;
            if fmi > *f {
                continue;
            }
            let y1 = third(x, &self.minima[i].x, 1.0);
            let f1 = eval.evaluate(&y1);
            eval.improve(&y1, f1);
            eval.check()?;
            if f1 > *f {
                continue;
            }
            let y2 = third(x, &self.minima[i].x, 2.0);
            let f2 = eval.evaluate(&y2);
            eval.improve(&y2, f2);
            eval.check()?;
            if f2 > f1.max(fmi) {
                if f1 < *f {
                    *x = y1;
                    *f = f1;
                    eval.improve(x, *f);
                    eval.check()?;
                }
            } else if f1 < f2.min(fmi) {
                *x = y1;
                *f = f1;
                eval.improve(x, *f);
                eval.check()?;
            } else if f2 < f1.min(fmi) {
                *x = y2;
                *f = f2;
                eval.improve(x, *f);
                eval.check()?;
            } else {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Screen a local-search result against the known minima.
    ///
    /// Returns `Ok(true)` if the result lies in the domain of attraction of
    /// an existing minimum. That minimum then keeps the best of itself, the
    /// result and the two samples between them.
    pub fn candidate_inside_domain_of_attraction(
        &mut self,
        eval: &mut Evaluator,
        x: &[f64],
        f: f64,
        nbasket: usize,
    ) -> Step<bool> {
        for i in self.nearest_first(x, nbasket) {
            let fmi = self.minima[i].f;
            let y1 = third(x, &self.minima[i].x, 1.0);
            let f1 = eval.evaluate(&y1);
            eval.improve(&y1, f1);
            eval.check()?;
            if f1 > fmi.max(f) {
                continue;
            }
            let y2 = third(x, &self.minima[i].x, 2.0);
            let f2 = eval.evaluate(&y2);
            eval.improve(&y2, f2);
            eval.check()?;
            if f2 > f1.max(fmi) {
                continue;
            }
            let replacement = if f < f1.min(f2).min(fmi) {
                Some(BasketEntry::new(x.to_vec(), f))
            } else if f1 < f.min(f2).min(fmi) {
                Some(BasketEntry::new(y1, f1))
            } else if f2 < f.min(f1).min(fmi) {
                Some(BasketEntry::new(y2, f2))
            } else {
                None
            };
            if let Some(entry) = replacement {
                eval.improve(&entry.x, entry.f);
                self.minima[i] = entry;
                eval.check()?;
            }
            return Ok(true);
        }
        Ok(false)
    }
}

//! Split decision.
//!
//! Chooses, for the box selected at level `s`, between a rank-based split, a
//! split driven by the expected gain of a quadratic model, and no split at all.
//! Executing the decision lives with the orchestrator in [`crate::mcs`].

use crate::init::InitList;
use crate::quadratic::{rank_split, subint, Quadratic};
use crate::vertex::Vertices;

/// Where a chosen dimension is split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitTarget {
    /// Fan out over the initialization list of the dimension.
    InitList,
    /// Regular split at this coordinate.
    At(f64),
}

/// Outcome of the split decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitDecision {
    /// The box is undersplit for its level: split the least-split dimension.
    ByRank { dim: usize, target: SplitTarget },
    /// The quadratic models predict an improvement of the best value.
    ByGain {
        dim: usize,
        target: SplitTarget,
        expected: f64,
    },
    /// No predicted improvement; the box is flagged and never re-examined.
    NoGain,
    /// The box was flagged earlier.
    NoSplit,
}

impl SplitDecision {
    /// Dimension and target of a split, if one was chosen.
    pub fn split(&self) -> Option<(usize, SplitTarget)> {
        match *self {
            SplitDecision::ByRank { dim, target } | SplitDecision::ByGain { dim, target, .. } => {
                Some((dim, target))
            }
            SplitDecision::NoGain | SplitDecision::NoSplit => None,
        }
    }
}

/// Decide how to treat a box at level `level` with base value `f`.
pub fn decide(
    v: &Vertices,
    init: &InitList,
    level: usize,
    f: f64,
    no_gain: bool,
    fbest: f64,
) -> SplitDecision {
    let n = v.x.len();
    if level > 2 * n * (v.min_splits() + 1) {
        let (dim, target) = rank_choice(v, &init.ranking);
        return SplitDecision::ByRank { dim, target };
    }
    if no_gain {
        return SplitDecision::NoSplit;
    }
    match expected_gain(v, init, f) {
        Some((dim, target, gain)) if f + gain < fbest => SplitDecision::ByGain {
            dim,
            target,
            expected: f + gain,
        },
        _ => SplitDecision::NoGain,
    }
}

/// Least-split dimension; ties go to the dimension with the smaller entry
/// in `ranking`.
pub fn rank_choice(v: &Vertices, ranking: &[usize]) -> (usize, SplitTarget) {
    let mut dim = 0;
    let mut n1 = v.n0[0];
    let mut p1 = ranking[0];
    for i in 1..v.n0.len() {
        if v.n0[i] < n1 || (v.n0[i] == n1 && ranking[i] < p1) {
            dim = i;
            n1 = v.n0[i];
            p1 = ranking[i];
        }
    }
    let target = if n1 > 0 {
        SplitTarget::At(rank_split(v.x[dim], v.y[dim]))
    } else {
        SplitTarget::InitList
    };
    (dim, target)
}

/// Per-dimension expected gains.
///
/// Dimensions never split on the path use the spread of their
/// initialization-list values. Others minimize the quadratic through the base
/// vertex and its two neighbours (values relative to `fx`) over the
/// safeguarded subinterval toward the opposite vertex.
pub fn gains(v: &Vertices, init: &InitList, fx: f64) -> Vec<(f64, SplitTarget)> {
    (0..v.x.len())
        .map(|i| {
            if v.n0[i] == 0 {
                let column = &init.values[i];
                let lowest = column.iter().copied().fold(f64::INFINITY, f64::min);
                (lowest - column[init.initial[i]], SplitTarget::InitList)
            } else {
                let z = [v.x[i], v.x1[i], v.x2[i]];
                let q = Quadratic::interpolate(z, [0.0, v.f1[i] - fx, v.f2[i] - fx]);
                let (eta1, eta2) = subint(v.x[i], v.y[i]);
                let at = q.minimize_on(eta1.min(eta2), eta1.max(eta2));
                (q.eval(at), SplitTarget::At(at))
            }
        })
        .collect()
}

/// Dimension with the smallest expected gain, with its target and gain.
pub fn expected_gain(v: &Vertices, init: &InitList, fx: f64) -> Option<(usize, SplitTarget, f64)> {
    let mut best: Option<(usize, SplitTarget, f64)> = None;
    let mut emin = f64::INFINITY;
    for (i, (e, target)) in gains(v, init, fx).into_iter().enumerate() {
        if e < emin {
            emin = e;
            best = Some((i, target, e));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_with(values: Vec<Vec<f64>>, ranking: Vec<usize>) -> InitList {
        let n = values.len();
        InitList {
            lower: vec![-5.0; n],
            upper: vec![5.0; n],
            coords: vec![vec![-5.0, 0.0, 5.0]; n],
            values,
            initial: vec![1; n],
            best: vec![1; n],
            ranking,
            far_vertex: vec![5.0; n],
        }
    }

    fn vertices(n0: Vec<usize>) -> Vertices {
        let n = n0.len();
        Vertices {
            x: vec![0.0; n],
            y: vec![4.0; n],
            x1: vec![-1.0; n],
            x2: vec![1.0; n],
            f1: vec![1.0; n],
            f2: vec![1.0; n],
            n0,
        }
    }

    #[test]
    fn test_rank_choice_least_split() {
        let v = vertices(vec![3, 1, 2]);
        let (dim, target) = rank_choice(&v, &[0, 1, 2]);
        assert_eq!(dim, 1);
        assert_eq!(target, SplitTarget::At(rank_split(0.0, 4.0)));
    }

    #[test]
    fn test_rank_choice_tie_uses_ranking_entries() {
        let v = vertices(vec![2, 2]);
        assert_eq!(rank_choice(&v, &[1, 0]).0, 1);
        assert_eq!(rank_choice(&v, &[0, 1]).0, 0);
    }

    #[test]
    fn test_rank_choice_unsplit_dimension_uses_init_list() {
        let v = vertices(vec![1, 0]);
        assert_eq!(rank_choice(&v, &[0, 1]), (1, SplitTarget::InitList));
    }

    #[test]
    fn test_gain_of_unsplit_dimension() {
        let init = init_with(vec![vec![3.0, 2.0, 0.5], vec![9.0, 2.0, 7.0]], vec![0, 1]);
        let v = vertices(vec![0, 0]);
        let g = gains(&v, &init, 2.0);
        assert_eq!(g[0], (-1.5, SplitTarget::InitList));
        assert_eq!(g[1], (0.0, SplitTarget::InitList));
        assert_eq!(expected_gain(&v, &init, 2.0), Some((0, SplitTarget::InitList, -1.5)));
    }

    #[test]
    fn test_gain_of_split_dimension() {
        // base 0 with value 1, neighbours -1 -> 1.5 and 1 -> 0.5: the model
        // is linear and decreases toward the opposite vertex at 4
        let init = init_with(vec![vec![0.0; 3]], vec![0]);
        let mut v = vertices(vec![1]);
        v.f1 = vec![1.5];
        v.f2 = vec![0.5];
        let (e, target) = gains(&v, &init, 1.0)[0];
        assert_eq!(target, SplitTarget::At(4.0));
        assert_eq!(e, -2.0);

        // symmetric neighbours: convex model, vertex at the base, so the
        // subinterval end nearest to it wins
        v.f2 = vec![1.5];
        let (e, target) = gains(&v, &init, 1.0)[0];
        assert_eq!(target, SplitTarget::At(0.4));
        assert!((e - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_decide_branches() {
        let init = init_with(vec![vec![3.0, 2.0, 0.5]], vec![0]);
        let v = vertices(vec![0]);
        // level above 2 n (min n0 + 1) forces a rank split
        assert_eq!(
            decide(&v, &init, 3, 2.0, false, 0.0),
            SplitDecision::ByRank {
                dim: 0,
                target: SplitTarget::InitList
            }
        );
        assert_eq!(decide(&v, &init, 2, 2.0, true, 0.0), SplitDecision::NoSplit);
        assert_eq!(
            decide(&v, &init, 2, 2.0, false, 1.0),
            SplitDecision::ByGain {
                dim: 0,
                target: SplitTarget::InitList,
                expected: 0.5
            }
        );
        assert_eq!(decide(&v, &init, 2, 2.0, false, 0.5), SplitDecision::NoGain);
        assert_eq!(SplitDecision::NoGain.split(), None);
    }
}

//! Vertex reconstruction.
//!
//! A box stores no coordinates. Its base vertex, opposite vertex and the two
//! neighbouring samples along every dimension are recovered by walking the
//! genealogy from the box up to the root.
//!
//! Neighbour values `f1`/`f2` are accumulated as differences: whenever the
//! walk crosses an ancestor whose base value differs from the running `fold`
//! value, every dimension that has not resolved its neighbour yet absorbs the
//! difference. For a separable objective this reproduces the true values at
//! the neighbouring points.

use crate::init::InitList;
use crate::quadratic::golden_split;
use crate::storage::{BoxId, BoxStorage, ChildRole, RegularChild};

const UNSET: f64 = f64::INFINITY;

/// Iterate state of one box.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertices {
    /// Base vertex.
    pub x: Vec<f64>,
    /// Opposite vertex.
    pub y: Vec<f64>,
    /// First neighbouring coordinate per dimension.
    pub x1: Vec<f64>,
    /// Second neighbouring coordinate per dimension.
    pub x2: Vec<f64>,
    /// Objective value at `x` with coordinate `i` replaced by `x1[i]`.
    pub f1: Vec<f64>,
    /// Objective value at `x` with coordinate `i` replaced by `x2[i]`.
    pub f2: Vec<f64>,
    /// Number of splits along each dimension on the path to the root.
    pub n0: Vec<usize>,
}

impl Vertices {
    fn unresolved(n: usize) -> Self {
        Self {
            x: vec![UNSET; n],
            y: vec![UNSET; n],
            x1: vec![UNSET; n],
            x2: vec![UNSET; n],
            f1: vec![0.0; n],
            f2: vec![0.0; n],
            n0: vec![0; n],
        }
    }

    /// Smallest split count over all dimensions.
    pub fn min_splits(&self) -> usize {
        self.n0.iter().copied().min().unwrap_or(0)
    }

    /// Absorb a change of the path's base value into every unresolved
    /// neighbour outside `dim`.
    fn fold_change(&mut self, dim: usize, fold: &mut f64, f: f64) {
        for k in 0..self.x.len() {
            if k == dim {
                continue;
            }
            if self.x1[k] == UNSET {
                self.f1[k] = self.f1[k] + *fold - f;
            }
            if self.x2[k] == UNSET {
                self.f2[k] = self.f2[k] + *fold - f;
            }
        }
        *fold = f;
    }

    /// The box sits on split coordinate `z[1 - j]`; `z[j]` is a neighbour.
    fn take_regular_base(&mut self, i: usize, j: usize, z: &[f64; 2], f: &[f64; 2]) {
        self.x[i] = z[1 - j];
        if self.x1[i] == UNSET {
            self.x1[i] = z[j];
            self.f1[i] += f[j];
        } else if self.x2[i] == UNSET && self.x1[i] != z[j] {
            self.x2[i] = z[j];
            self.f2[i] += f[j];
        }
    }

    /// The base coordinate is already known; both split coordinates are
    /// neighbour candidates, `z[j]` first.
    fn take_regular_neighbours(&mut self, i: usize, j: usize, z: &[f64; 2], f: &[f64; 2]) {
        let other = 1 - j;
        if self.x1[i] == UNSET {
            self.x1[i] = z[j];
            self.f1[i] += f[j];
            if self.x[i] != z[other] {
                self.x2[i] = z[other];
                self.f2[i] += f[other];
            }
        } else if self.x2[i] == UNSET && self.x1[i] != z[j] {
            self.x2[i] = z[j];
            self.f2[i] += f[j];
        } else if self.x2[i] == UNSET {
            self.x2[i] = z[other];
            self.f2[i] += f[other];
        }
    }

    /// Both neighbours from the candidate list around position `pos`.
    fn take_list_neighbours(&mut self, i: usize, pos: usize, x0: &[f64], f0: &[f64]) {
        let l = x0.len();
        let (k1, k2) = if pos == 0 {
            (1, 2)
        } else if pos == l - 1 {
            (l - 3, l - 2)
        } else {
            (pos - 1, pos + 1)
        };
        self.x1[i] = x0[k1];
        self.x2[i] = x0[k2];
        self.f1[i] += f0[k1];
        self.f2[i] += f0[k2];
    }

    fn set_second(&mut self, i: usize, x0: &[f64], f0: &[f64], k: usize) {
        self.x2[i] = x0[k];
        self.f2[i] += f0[k];
    }
}

/// Candidate position `pos` moved by `step`, kept inside the list.
fn offset(pos: usize, step: isize, l: usize) -> usize {
    (pos as isize + step).clamp(0, l as isize - 1) as usize
}

/// Position of an initialization-list child inside the candidate list.
///
/// Returns `(pos, left, dir)`: `pos` is the 0-based candidate the child sits
/// on, `left` counts candidates strictly left of the child's interval
/// (`0` means the interval starts at the lower bound, `L` means it ends at the
/// upper bound) and `dir` points from `pos` toward the other end of the
/// interval.
fn list_position(ordinal: usize, lower_box: bool, l: usize) -> (usize, usize, isize) {
    let odd = ordinal % 2 == 1;
    if lower_box {
        let j1 = (ordinal + 1) / 2;
        let dir = if (odd && j1 > 1) || j1 == l { -1 } else { 1 };
        (j1 - 1, ordinal / 2, dir)
    } else {
        let j1 = ordinal / 2 + 1;
        let dir = if odd && j1 < l { 1 } else { -1 };
        (j1 - 1, (ordinal + 1) / 2, dir)
    }
}

/// Reconstruct the iterate state of box `id`.
pub fn reconstruct(storage: &BoxStorage, init: &InitList, id: BoxId) -> Vertices {
    let n = init.dim();
    let l = init.population_size();
    let mut v = Vertices::unresolved(n);
    let mut fold = storage.get(id).f[0];
    let mut m = id;

    while let Some(par) = storage.get(m).parent {
        let parent = storage.get(par);
        let Some(split) = parent.split else {
            break;
        };
        let i = split.dim();
        v.n0[i] += 1;
        let role = storage.get(m).role;

        match role {
            ChildRole::Regular(RegularChild::First) => {
                if v.x[i] == UNSET || v.x[i] == parent.z[0] {
                    v.take_regular_base(i, 1, &parent.z, &parent.f);
                } else {
                    v.fold_change(i, &mut fold, parent.f[0]);
                    v.take_regular_neighbours(i, 0, &parent.z, &parent.f);
                }
            }
            ChildRole::Regular(_) => {
                v.fold_change(i, &mut fold, parent.f[0]);
                if v.x[i] == UNSET || v.x[i] == parent.z[1] {
                    v.take_regular_base(i, 0, &parent.z, &parent.f);
                } else {
                    v.take_regular_neighbours(i, 1, &parent.z, &parent.f);
                }
            }
            ChildRole::InitList { ordinal } => {
                let x0 = &init.coords[i];
                let column = match split {
                    crate::storage::Split::InitList { column, .. } => column,
                    crate::storage::Split::Regular { .. } => i,
                };
                let f0 = &init.values[column];
                let start = init.initial[i];
                let (pos, left, dir) = list_position(ordinal, init.has_lower_box(i), l);

                if pos != start || (v.x[i] != UNSET && v.x[i] != x0[start]) {
                    v.fold_change(i, &mut fold, f0[start]);
                }
                let interior = pos != 0 && pos != l - 1;
                let fallback = if interior {
                    offset(pos, -dir, l)
                } else {
                    offset(pos, 2 * dir, l)
                };
                let across = offset(pos, dir, l);

                if v.x[i] == UNSET || v.x[i] == x0[pos] {
                    v.x[i] = x0[pos];
                    if v.x1[i] == UNSET {
                        v.take_list_neighbours(i, pos, x0, f0);
                    } else if v.x2[i] == UNSET && v.x1[i] != x0[across] {
                        v.set_second(i, x0, f0, across);
                    } else if v.x2[i] == UNSET {
                        v.set_second(i, x0, f0, fallback);
                    }
                } else if v.x1[i] == UNSET {
                    v.x1[i] = x0[pos];
                    v.f1[i] += f0[pos];
                    if v.x[i] != x0[across] {
                        v.set_second(i, x0, f0, across);
                    }
                } else if v.x2[i] == UNSET {
                    if v.x1[i] != x0[pos] {
                        v.set_second(i, x0, f0, pos);
                    } else if v.x[i] != x0[across] {
                        v.set_second(i, x0, f0, across);
                    } else {
                        v.set_second(i, x0, f0, fallback);
                    }
                }

                if v.y[i] == UNSET {
                    v.y[i] = if left == 0 {
                        init.lower[i]
                    } else if left == l {
                        init.upper[i]
                    } else {
                        golden_split(x0[left - 1], x0[left], f0[left - 1], f0[left])
                    };
                }
            }
            ChildRole::Root => break,
        }

        if matches!(
            role,
            ChildRole::Regular(RegularChild::First) | ChildRole::Regular(RegularChild::Second)
        ) && v.y[i] == UNSET
        {
            v.y[i] = golden_split(parent.z[0], parent.z[1], parent.f[0], parent.f[1]);
        }
        m = par;
    }

    for i in 0..n {
        if v.x[i] == UNSET {
            let start = init.initial[i];
            v.x[i] = init.coords[i][start];
            v.take_list_neighbours(i, start, &init.coords[i], &init.values[i]);
        }
        if v.y[i] == UNSET {
            v.y[i] = init.far_vertex[i];
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::Evaluator;
    use crate::storage::Split;
    use crate::types::{InitListStrategy, McsOptions};
    use std::sync::Arc;

    fn shifted(x: &[f64]) -> f64 {
        (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2)
    }

    fn seeded(options: &McsOptions) -> (InitList, BoxStorage) {
        let mut init = InitList::build(&[-5.0, -5.0], &[5.0, 5.0], options).unwrap();
        let mut ev = Evaluator::new(Arc::new(shifted), options, 2);
        init.evaluate(&mut ev).unwrap();
        let mut storage = BoxStorage::new();
        init.seed_boxes(&mut storage);
        (init, storage)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn test_list_position() {
        // no lower boundary box, L = 3: children sit on 0, 1, 1, 2 (+ upper box on 2)
        let got: Vec<_> = (1..=5).map(|c| list_position(c, false, 3)).collect();
        assert_eq!(
            got,
            vec![(0, 1, 1), (1, 1, -1), (1, 2, 1), (2, 2, -1), (2, 3, -1)]
        );
        // lower boundary box first
        let got: Vec<_> = (1..=3).map(|c| list_position(c, true, 3)).collect();
        assert_eq!(got, vec![(0, 0, 1), (0, 1, 1), (1, 1, -1)]);
    }

    #[test]
    fn test_second_fanout_child() {
        let (init, storage) = seeded(&McsOptions::default());
        let v = reconstruct(&storage, &init, BoxId(6));
        assert_eq!(v.x, vec![0.0, 0.0]);
        assert_eq!(v.x1, vec![-5.0, -5.0]);
        assert_eq!(v.x2, vec![5.0, 5.0]);
        assert_eq!(v.f1, vec![40.0, 10.0]);
        assert_eq!(v.f2, vec![20.0, 50.0]);
        assert_eq!(v.n0, vec![1, 1]);
        assert_eq!(v.min_splits(), 1);
        let ratio = 0.5 * (5f64.sqrt() - 1.0);
        assert!(close(v.y[0], 5.0 * ratio));
        assert!(close(v.y[1], -5.0 + 5.0 * (1.0 - ratio)));
    }

    #[test]
    fn test_first_fanout_child_uses_far_vertex() {
        let (init, storage) = seeded(&McsOptions::default());
        let v = reconstruct(&storage, &init, BoxId(2));
        assert_eq!(v.x, vec![0.0, 0.0]);
        assert_eq!(v.n0, vec![1, 0]);
        assert_eq!(v.x1[1], -5.0);
        assert_eq!(v.f1[1], 10.0);
        assert_eq!(v.f2[1], 50.0);
        assert_eq!(v.y[1], init.far_vertex[1]);
        assert_eq!(v.y[1], 5.0);
    }

    #[test]
    fn test_separable_neighbours_are_exact() {
        let (init, storage) = seeded(&McsOptions::default());
        for (id, b) in storage.iter().filter(|(_, b)| b.is_active()) {
            let v = reconstruct(&storage, &init, id);
            assert_eq!(shifted(&v.x), b.f[0], "base value of {}", id);
            for i in 0..2 {
                let mut p = v.x.clone();
                p[i] = v.x1[i];
                assert!(close(shifted(&p), v.f1[i]), "{} f1[{}]", id, i);
                p[i] = v.x2[i];
                assert!(close(shifted(&p), v.f2[i]), "{} f2[{}]", id, i);
            }
        }
    }

    #[test]
    fn test_fold_shift_for_off_start_child() {
        let (init, storage) = seeded(&McsOptions::default());
        let v = reconstruct(&storage, &init, BoxId(1));
        assert_eq!(v.x, vec![-5.0, 0.0]);
        assert_eq!(v.x1[0], 0.0);
        assert_eq!(v.x2[0], 5.0);
        assert_eq!(v.f1, vec![5.0, 45.0]);
        assert_eq!(v.f2, vec![20.0, 85.0]);
    }

    #[test]
    fn test_regular_split_child() {
        let (init, mut storage) = seeded(&McsOptions::default());
        let par = BoxId(6);
        storage.mark_split(par, Split::Regular { dim: 0 });
        storage.get_mut(par).z = [0.0, 2.0];
        storage.get_mut(par).f[1] = shifted(&[2.0, 0.0]);
        storage.create(Some(par), 3, ChildRole::Regular(RegularChild::First), 5.0);
        let second = storage.create(Some(par), 3, ChildRole::Regular(RegularChild::Second), 5.0);

        let v = reconstruct(&storage, &init, second);
        assert_eq!(v.x, vec![2.0, 0.0]);
        assert_eq!(v.n0, vec![2, 1]);
        assert_eq!((v.x1[0], v.f1[0]), (0.0, 5.0));
        assert_eq!((v.x2[0], v.f2[0]), (5.0, 20.0));
        assert!(close(v.y[0], 2.0 * 0.5 * (5f64.sqrt() - 1.0)));
    }

    #[test]
    fn test_interior_list_separable_neighbours() {
        let options = McsOptions {
            init_list: InitListStrategy::Interior,
            ..Default::default()
        };
        let (init, storage) = seeded(&options);
        assert!(init.has_lower_box(0) && init.has_upper_box(1));
        for (id, b) in storage.iter().filter(|(_, b)| b.is_active()) {
            let v = reconstruct(&storage, &init, id);
            assert!(close(shifted(&v.x), b.f[0]), "base value of {}", id);
            for i in 0..2 {
                assert!(v.x1[i] != v.x[i] && v.x2[i] != v.x[i]);
                assert!(v.y[i] >= -5.0 && v.y[i] <= 5.0);
            }
        }
    }
}

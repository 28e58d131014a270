//! Quadratic helpers used by the split heuristics.
//!
//! All routines are pure. The interpolating quadratic is kept in Newton form
//! `d0 + d1 (x - n0) + d2 (x - n0)(x - n1)` where `n0`, `n1` are the first two
//! interpolation nodes.

/// Quadratic through three points in Newton form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic {
    /// Newton coefficients `[d0, d1, d2]`.
    pub d: [f64; 3],
    /// First two interpolation nodes.
    pub nodes: [f64; 2],
}

impl Quadratic {
    /// Interpolate `f` at the three nodes `x`.
    pub fn interpolate(x: [f64; 3], f: [f64; 3]) -> Self {
        let d0 = f[0];
        let d1 = (f[1] - f[0]) / (x[1] - x[0]);
        let d2 = ((f[2] - f[1]) / (x[2] - x[1]) - d1) / (x[2] - x[0]);
        Self {
            d: [d0, d1, d2],
            nodes: [x[0], x[1]],
        }
    }

    /// Value of the quadratic at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        let [d0, d1, d2] = self.d;
        d0 + d1 * (x - self.nodes[0]) + d2 * (x - self.nodes[0]) * (x - self.nodes[1])
    }

    /// The quadratic with all coefficients negated.
    pub fn negated(&self) -> Self {
        Self {
            d: [-self.d[0], -self.d[1], -self.d[2]],
            nodes: self.nodes,
        }
    }

    /// Minimizer of the quadratic on `[a, b]`.
    ///
    /// A linear model picks the bound indicated by the slope sign. A convex
    /// model returns its vertex when it lies inside the interval. Otherwise the
    /// bound with the lower model value wins (ties go to `b`).
    pub fn minimize_on(&self, a: f64, b: f64) -> f64 {
        let [_, d1, d2] = self.d;
        if d2 == 0.0 {
            return if d1 > 0.0 { a } else { b };
        }
        if d2 > 0.0 {
            let x = 0.5 * (self.nodes[0] + self.nodes[1]) - 0.5 * d1 / d2;
            if a <= x && x <= b {
                return x;
            }
        }
        if self.eval(a) < self.eval(b) {
            a
        } else {
            b
        }
    }

    /// Maximizer of the quadratic on `[a, b]`.
    pub fn maximize_on(&self, a: f64, b: f64) -> f64 {
        self.negated().minimize_on(a, b)
    }
}

/// Golden-section split point of `[x1, x2]`, biased toward the endpoint with
/// the smaller value.
pub fn golden_split(x1: f64, x2: f64, f1: f64, f2: f64) -> f64 {
    let sqrt5 = 5f64.sqrt();
    if f1 <= f2 {
        x1 + 0.5 * (sqrt5 - 1.0) * (x2 - x1)
    } else {
        x1 + 0.5 * (3.0 - sqrt5) * (x2 - x1)
    }
}

/// Split point between a coordinate `x` and its opposite vertex `y`, placed
/// two thirds of the way toward a safeguarded copy of `y`.
pub fn rank_split(x: f64, y: f64) -> f64 {
    let mut x2 = y;
    if x == 0.0 && y.abs() > 1000.0 {
        x2 = y.signum();
    } else if x != 0.0 && y.abs() > 100.0 * x.abs() {
        x2 = 10.0 * y.signum() * x.abs();
    }
    x + 2.0 * (x2 - x) / 3.0
}

/// Safeguarded subinterval between `x` and `y`.
///
/// Returns `(x1, x2)`: `x2` is `y` pulled back when `y` is huge relative to
/// `x` (or infinite), `x1` lies one tenth of the way from `x` to `x2`.
pub fn subint(x: f64, y: f64) -> (f64, f64) {
    const FACTOR: f64 = 1000.0;
    let mut x2 = y;
    if FACTOR * x.abs() < 1.0 {
        if y.abs() > FACTOR {
            x2 = y.signum();
        }
    } else if y.abs() > FACTOR * x.abs() {
        x2 = 10.0 * y.signum() * x.abs();
    }
    (x + (x2 - x) / 10.0, x2)
}

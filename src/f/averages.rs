use ndarray::{ArrayView1, ArrayViewMut1};

use super::{max, min};

pub fn sum(xx: &[f64]) -> f64 {
    ArrayView1::from(xx).sum()
}

pub fn mean(xx: &[f64]) -> f64 {
    ArrayView1::from(xx).mean().unwrap_or(0.)
}

/// Sample variance (n - 1 denominator). A single element has no spread.
pub fn variance(xx: &[f64]) -> f64 {
    if xx.len() < 2 {
        return 0.;
    }
    ArrayView1::from(xx).var(1.)
}

pub fn standard_deviation(xx: &[f64]) -> f64 {
    variance(xx).sqrt()
}

/// Z-score in place, shifting to mean 0 and standard deviation 1.
/// Constant input falls back to a unit deviation and comes out as zeros.
pub fn standardize(xx: &mut [f64]) {
    let m = mean(xx);
    let mut s = standard_deviation(xx);

    if s == 0. {
        s = 1.;
    }

    ArrayViewMut1::from(xx).mapv_inplace(|x| (x - m) / s);
}

/// Min-max scale in place to [0, 1]. Constant input becomes zeros.
pub fn normalize(xx: &mut [f64]) {
    if xx.is_empty() {
        return;
    }

    let (lo, hi) = (min(xx), max(xx));
    let range = hi - lo;

    ArrayViewMut1::from(xx).mapv_inplace(|x| if range == 0. { 0. } else { (x - lo) / range });
}

pub fn dot(xx: &[f64], yy: &[f64]) -> f64 {
    ArrayView1::from(xx).dot(&ArrayView1::from(yy))
}

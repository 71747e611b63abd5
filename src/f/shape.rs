use ndarray::ArrayView1;
use ndarray_stats::QuantileExt;

/// Index of the largest element, 0 for an empty or unordered slice.
pub fn argmax(d: &[f64]) -> usize {
    ArrayView1::from(d).argmax().unwrap_or(0)
}

pub fn argmin(d: &[f64]) -> usize {
    ArrayView1::from(d).argmin().unwrap_or(0)
}

pub fn max(d: &[f64]) -> f64 {
    ArrayView1::from(d)
        .max()
        .copied()
        .unwrap_or(f64::MIN)
}

pub fn min(d: &[f64]) -> f64 {
    ArrayView1::from(d)
        .min()
        .copied()
        .unwrap_or(f64::MAX)
}

pub fn onehot(i: u64, size: u64) -> Vec<f64> {
    let mut oh = vec![0.; size as usize];
    if i < size {
        oh[i as usize] = 1.;
    }
    oh
}

/// Numerically stable softmax; the maximum is subtracted before exponentiating.
pub fn softmax(d: &[f64]) -> Vec<f64> {
    if d.is_empty() {
        return vec![];
    }

    let x = ArrayView1::from(d);
    let max = max(d);
    let exps = x.mapv(|v| (v - max).exp());
    let sum_exps = exps.sum();

    (exps / sum_exps).to_vec()
}

pub fn sgn(x: f64) -> f64 {
    if x < 0. {
        return -1.;
    }
    if x > 0. {
        return 1.;
    }
    0.
}

/// Round half up to the nearest integer.
pub fn round(x: f64) -> f64 {
    (x + 0.5).floor()
}

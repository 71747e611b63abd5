pub fn logistic(x: f64, a: f64) -> f64 {
    1. / (1. + (-a * x).exp())
}

pub fn sigmoid(x: f64) -> f64 {
    logistic(x, 1.)
}

pub fn relu(x: f64) -> f64 {
    if x < 0. {
        return 0.;
    }
    x
}

/// ln(1 + e^x), switching to the asymptote where `exp` would overflow.
pub fn softplus(x: f64) -> f64 {
    if x > 30. {
        return x;
    }
    x.exp().ln_1p()
}

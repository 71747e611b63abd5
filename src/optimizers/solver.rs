use std::ops::Range;

/// A per-weight update rule with `width` accumulator slots per weight.
pub trait Rule: Sync {
    fn width(&self) -> usize;
    /// Weight delta for one weight, given that weight's accumulator slots.
    fn step(&self, slots: &mut [f64], value: f64, gradient: f64, iteration: usize) -> f64;
}

/// Maps gradients to weight deltas, keeping accumulators per flat weight
/// index (see `WeightIndex`).
pub trait Solver: Send {
    /// Size the accumulators for `size` weights, resetting any previous run.
    fn init(&mut self, size: usize);
    /// Delta for the weight at `idx`. `init` must have been called with a
    /// size greater than `idx`.
    fn update(&mut self, value: f64, gradient: f64, iteration: usize, idx: usize) -> f64;
    /// Split the accumulators into disjoint views, one per flat index range.
    /// `bounds` must be ascending and non-overlapping.
    fn regions(&mut self, bounds: &[Range<usize>]) -> Vec<SolverRegion<'_>>;
}

/// Exclusive view over the accumulators of a contiguous run of weights.
pub struct SolverRegion<'a> {
    rule: &'a dyn Rule,
    start: usize,
    slots: &'a mut [f64],
}

impl SolverRegion<'_> {
    /// Same as `Solver::update`; `idx` is the global flat index.
    pub fn update(&mut self, value: f64, gradient: f64, iteration: usize, idx: usize) -> f64 {
        let width = self.rule.width();
        let at = (idx - self.start) * width;
        self.rule
            .step(&mut self.slots[at..at + width], value, gradient, iteration)
    }
}

/// A rule together with its accumulators.
#[derive(Debug, Clone)]
pub struct Stateful<R> {
    rule: R,
    moments: Vec<f64>,
}

impl<R: Rule + Send> Solver for Stateful<R> {
    fn init(&mut self, size: usize) {
        self.moments = vec![0.; size * self.rule.width()];
    }

    fn update(&mut self, value: f64, gradient: f64, iteration: usize, idx: usize) -> f64 {
        let width = self.rule.width();
        let at = idx * width;
        self.rule
            .step(&mut self.moments[at..at + width], value, gradient, iteration)
    }

    fn regions(&mut self, bounds: &[Range<usize>]) -> Vec<SolverRegion<'_>> {
        let width = self.rule.width();
        let rule: &dyn Rule = &self.rule;
        let mut rest: &mut [f64] = &mut self.moments;
        let mut consumed = 0;
        let mut regions = Vec::with_capacity(bounds.len());

        for b in bounds {
            let (_, tail) = std::mem::take(&mut rest).split_at_mut((b.start - consumed) * width);
            let (slots, tail) = tail.split_at_mut(b.len() * width);
            rest = tail;
            consumed = b.end;

            regions.push(SolverRegion {
                rule,
                start: b.start,
                slots,
            });
        }

        regions
    }
}

/// Stochastic gradient descent with momentum, time decay and optional
/// Nesterov look-ahead.
#[derive(Debug, Clone, Copy)]
pub struct Momentum {
    lr: f64,
    momentum: f64,
    decay: f64,
    nesterov: bool,
}

impl Rule for Momentum {
    fn width(&self) -> usize {
        1
    }

    fn step(&self, slots: &mut [f64], _: f64, gradient: f64, iteration: usize) -> f64 {
        let lr = self.lr / (1. + self.decay * iteration as f64);

        slots[0] = self.momentum * slots[0] - lr * gradient;
        if self.nesterov {
            slots[0] = self.momentum * slots[0] - lr * gradient;
        }

        slots[0]
    }
}

pub type Sgd = Stateful<Momentum>;

impl Stateful<Momentum> {
    /// A zero learning rate falls back to 0.01.
    pub fn new(lr: f64, momentum: f64, decay: f64, nesterov: bool) -> Sgd {
        Stateful {
            rule: Momentum {
                lr: fparam(lr, 0.01),
                momentum,
                decay,
                nesterov,
            },
            moments: vec![],
        }
    }
}

/// Adam: bias-corrected first and second moment estimates.
#[derive(Debug, Clone, Copy)]
pub struct Moments {
    lr: f64,
    beta: f64,
    beta2: f64,
    epsilon: f64,
}

impl Rule for Moments {
    fn width(&self) -> usize {
        2
    }

    fn step(&self, slots: &mut [f64], _: f64, gradient: f64, iteration: usize) -> f64 {
        let t = iteration.max(1) as i32;
        let lrt = self.lr * (1. - self.beta2.powi(t)).sqrt() / (1. - self.beta.powi(t));

        slots[0] = self.beta * slots[0] + (1. - self.beta) * gradient;
        slots[1] = self.beta2 * slots[1] + (1. - self.beta2) * gradient.powi(2);

        -lrt * (slots[0] / (slots[1].sqrt() + self.epsilon))
    }
}

pub type Adam = Stateful<Moments>;

impl Stateful<Moments> {
    /// Zero parameters fall back to 0.001, 0.9, 0.999 and 1e-8.
    pub fn new(lr: f64, beta: f64, beta2: f64, epsilon: f64) -> Adam {
        Stateful {
            rule: Moments {
                lr: fparam(lr, 0.001),
                beta: fparam(beta, 0.9),
                beta2: fparam(beta2, 0.999),
                epsilon: fparam(epsilon, 1e-8),
            },
            moments: vec![],
        }
    }
}

pub fn fparam(value: f64, fallback: f64) -> f64 {
    if value == 0. {
        return fallback;
    }
    value
}

pub fn iparam(value: usize, fallback: usize) -> usize {
    if value == 0 {
        return fallback;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sgd_momentum_accumulates() {
        let mut s = Sgd::new(0.1, 0.5, 0., false);
        s.init(2);

        assert_relative_eq!(s.update(0., 1., 1, 0), -0.1);
        // 0.5 * -0.1 - 0.1
        assert_relative_eq!(s.update(0., 1., 2, 0), -0.15);
        // untouched index starts fresh
        assert_relative_eq!(s.update(0., 2., 2, 1), -0.2);
    }

    #[test]
    fn sgd_decay_and_nesterov() {
        let mut s = Sgd::new(1., 0.5, 1., true);
        s.init(1);

        // lr = 1 / (1 + 1 * 1) = 0.5; m = -0.5, then 0.5 * -0.5 - 0.5
        assert_relative_eq!(s.update(0., 1., 1, 0), -0.75);
    }

    #[test]
    fn zero_parameters_fall_back() {
        let mut s = Sgd::new(0., 0., 0., false);
        s.init(1);
        assert_relative_eq!(s.update(0., 1., 1, 0), -0.01);

        assert_eq!(fparam(0., 3.), 3.);
        assert_eq!(fparam(2., 3.), 2.);
        assert_eq!(iparam(0, 4), 4);
    }

    #[test]
    fn adam_first_step_is_learning_rate() {
        let mut a = Adam::new(0.01, 0., 0., 0.);
        a.init(3);

        // bias correction makes the first step -lr * sgn(g)
        assert_relative_eq!(a.update(0., 4., 1, 2), -0.01, epsilon = 1e-6);
        assert_relative_eq!(a.update(0., -0.5, 1, 0), 0.01, epsilon = 1e-6);
    }

    #[test]
    fn adam_iteration_zero_is_treated_as_one() {
        let mut a = Adam::new(0.01, 0., 0., 0.);
        a.init(1);
        assert!(a.update(0., 1., 0, 0).is_finite());
    }

    #[test]
    fn regions_address_the_same_state() {
        let bounds = [0..3, 3..5];

        let mut flat = Adam::new(0.01, 0., 0., 0.);
        flat.init(5);
        let mut split = Adam::new(0.01, 0., 0., 0.);
        split.init(5);

        for it in 1..4 {
            let expected = (0..5)
                .map(|i| flat.update(0., i as f64 - 2., it, i))
                .collect::<Vec<f64>>();

            let mut regions = split.regions(&bounds);
            let (head, tail) = regions.split_at_mut(1);
            let mut got = (0..3)
                .map(|i| head[0].update(0., i as f64 - 2., it, i))
                .collect::<Vec<f64>>();
            got.extend((3..5).map(|i| tail[0].update(0., i as f64 - 2., it, i)));

            assert_eq!(got, expected);
        }
    }

    #[test]
    fn init_resets_state() {
        let mut s = Sgd::new(0.1, 0.9, 0., false);
        s.init(1);
        s.update(0., 1., 1, 0);
        s.init(1);
        assert_relative_eq!(s.update(0., 1., 1, 0), -0.1);
    }
}

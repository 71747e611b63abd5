use std::fmt::Debug;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-9;

pub trait Loss {
    /// Aggregate loss of a set of estimates against their ideals.
    fn f(&self, estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> f64;
    /// Output-layer error for one neuron, given its output activation slope.
    fn df(&self, estimate: f64, ideal: f64, activation: f64) -> f64;
}

impl Debug for dyn Loss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LossFn")
    }
}

fn clip(p: f64) -> f64 {
    p.clamp(EPS, 1. - EPS)
}

pub struct MeanSquared;

impl MeanSquared {
    pub fn new() -> Rc<MeanSquared> {
        Rc::new(MeanSquared)
    }
}

impl Loss for MeanSquared {
    fn f(&self, estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> f64 {
        let count = estimate.iter().map(|e| e.len()).sum::<usize>();
        if count == 0 {
            return 0.;
        }

        let sum = estimate
            .iter()
            .zip(ideal.iter())
            .flat_map(|(e, i)| e.iter().zip(i.iter()))
            .fold(0., |a, (e, i)| a + (e - i).powi(2));

        sum / count as f64
    }

    fn df(&self, estimate: f64, ideal: f64, activation: f64) -> f64 {
        activation * (estimate - ideal)
    }
}

/// Categorical cross-entropy, paired with a softmax output layer.
pub struct CrossEntropy;

impl CrossEntropy {
    pub fn new() -> Rc<CrossEntropy> {
        Rc::new(CrossEntropy)
    }
}

impl Loss for CrossEntropy {
    fn f(&self, estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> f64 {
        if estimate.is_empty() {
            return 0.;
        }

        let sum = estimate
            .iter()
            .zip(ideal.iter())
            .map(|(e, i)| {
                -e.iter()
                    .zip(i.iter())
                    .fold(0., |a, (e, i)| a + i * clip(*e).ln())
            })
            .sum::<f64>();

        sum / estimate.len() as f64
    }

    // The softmax slope cancels against the log, leaving the plain residual.
    fn df(&self, estimate: f64, ideal: f64, _: f64) -> f64 {
        estimate - ideal
    }
}

/// Binary cross-entropy, paired with a sigmoid output layer.
pub struct BinaryCrossEntropy;

impl BinaryCrossEntropy {
    pub fn new() -> Rc<BinaryCrossEntropy> {
        Rc::new(BinaryCrossEntropy)
    }
}

impl Loss for BinaryCrossEntropy {
    fn f(&self, estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> f64 {
        if estimate.is_empty() {
            return 0.;
        }

        let sum = estimate
            .iter()
            .zip(ideal.iter())
            .map(|(e, i)| {
                -e.iter().zip(i.iter()).fold(0., |a, (e, t)| {
                    let p = clip(*e);
                    a + t * p.ln() + (1. - t) * (1. - p).ln()
                })
            })
            .sum::<f64>();

        sum / estimate.len() as f64
    }

    fn df(&self, estimate: f64, ideal: f64, _: f64) -> f64 {
        estimate - ideal
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Losses {
    CrossEntropy,
    BinaryCrossEntropy,
    MeanSquared,
}

impl Losses {
    pub fn wake(&self) -> Rc<dyn Loss> {
        match self {
            Losses::CrossEntropy => CrossEntropy::new(),
            Losses::BinaryCrossEntropy => BinaryCrossEntropy::new(),
            Losses::MeanSquared => MeanSquared::new(),
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Losses::CrossEntropy => "CE",
            Losses::BinaryCrossEntropy => "BCE",
            Losses::MeanSquared => "MSE",
        }
    }
}

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::data::Example;
use crate::error::NetworkError;
use crate::nn::Network;

use super::calculate_loss;

/// Greedy search over the network's input `significance` and `shift`.
///
/// Each step nudges one scalar of one random input by a signed random amount
/// scaled by `significance` or `shift`, and keeps the nudge only if the
/// validation loss strictly drops. A zero magnitude disables that branch.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    pub significance: f64,
    pub shift: f64,
    rng: StdRng,
}

impl NoiseFilter {
    pub fn new(significance: f64, shift: f64) -> NoiseFilter {
        NoiseFilter {
            significance,
            shift,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// One search step. Returns the loss the network ends up with, or `None`
    /// when both magnitudes are zero and nothing was tried.
    pub fn step(
        &mut self,
        n: &mut Network,
        validation: &[Example],
    ) -> Result<Option<f64>, NetworkError> {
        if self.significance == 0. && self.shift == 0. {
            log::warn!("noise filter step skipped, significance and shift are both zero");
            return Ok(None);
        }

        let loss = calculate_loss(n, validation)?;

        let ri = self.rng.gen_range(0..n.config.inputs);
        let mut rf = self.rng.gen::<f64>();
        let ra = self.rng.gen::<f64>() * 2. - 1.;

        if self.significance == 0. {
            rf = 1.;
        } else if self.shift == 0. {
            rf = 0.;
        }

        let (target, magnitude) = if rf > 0.5 {
            (&mut n.shift, self.shift)
        } else {
            (&mut n.significance, self.significance)
        };
        let old = target[ri];
        target[ri] += magnitude * ra;

        let updated = calculate_loss(n, validation)?;
        if updated < loss {
            log::debug!("noise filter kept input {}: loss {} -> {}", ri, loss, updated);
            return Ok(Some(updated));
        }

        if rf > 0.5 {
            n.shift[ri] = old;
        } else {
            n.significance[ri] = old;
        }

        Ok(Some(loss))
    }

    /// Run `steps` steps, returning the final loss.
    pub fn run(
        &mut self,
        n: &mut Network,
        validation: &[Example],
        steps: usize,
    ) -> Result<Option<f64>, NetworkError> {
        let mut loss = None;
        for _ in 0..steps {
            loss = self.step(n, validation)?;
        }
        Ok(loss)
    }
}

use std::ops::Deref;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::f::round_robin;
use crate::Dataset;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Example {
    pub input: Vec<f64>,
    pub response: Vec<f64>,
}

impl Example {
    pub fn new(input: Vec<f64>, response: Vec<f64>) -> Example {
        Example { input, response }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Examples(pub Vec<Example>);

impl Examples {
    pub fn new() -> Examples {
        Examples(Vec::new())
    }

    pub fn insert(&mut self, input: Vec<f64>, response: Vec<f64>) -> &mut Self {
        self.0.push(Example::new(input, response));
        self
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.0.shuffle(rng);
    }

    /// Randomly send each example to the first set with probability `p`.
    pub fn split<R: Rng + ?Sized>(&self, p: f64, rng: &mut R) -> (Examples, Examples) {
        let (first, second) = self.0.iter().cloned().partition(|_| rng.gen::<f64>() < p);
        (Examples(first), Examples(second))
    }

    /// Consecutive batches of `size`; the last one may be short.
    pub fn split_size(&self, size: usize) -> Vec<&[Example]> {
        self.0.chunks(size.max(1)).collect()
    }

    /// `n` sets dealt round-robin.
    pub fn split_n(&self, n: usize) -> Vec<Examples> {
        round_robin(self.0.iter().cloned(), n)
            .into_iter()
            .map(Examples)
            .collect()
    }
}

impl Deref for Examples {
    type Target = [Example];

    fn deref(&self) -> &[Example] {
        &self.0
    }
}

impl From<Vec<Example>> for Examples {
    fn from(examples: Vec<Example>) -> Examples {
        Examples(examples)
    }
}

impl From<Dataset> for Examples {
    fn from((x, y): Dataset) -> Examples {
        x.into_iter()
            .zip(y)
            .map(|(input, response)| Example::new(input, response))
            .collect()
    }
}

impl FromIterator<Example> for Examples {
    fn from_iter<I: IntoIterator<Item = Example>>(iter: I) -> Examples {
        Examples(iter.into_iter().collect())
    }
}

use std::ops::Range;

use ndarray_rand::rand_distr::{Distribution, Normal, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Network;

/// Weights grouped as `[layer][neuron][synapse]`.
pub type Weights = Vec<Vec<Vec<f64>>>;

/// Source of initial weights.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum WeightInitializer {
    /// Uniform over `mean ± std_dev / 2`.
    Uniform { std_dev: f64, mean: f64 },
    /// Normal with the given mean and standard deviation.
    Normal { std_dev: f64, mean: f64 },
}

impl WeightInitializer {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            WeightInitializer::Uniform { std_dev, mean } => {
                let half = std_dev.abs() / 2.;
                if half == 0. {
                    return mean;
                }
                Uniform::new(mean - half, mean + half).sample(rng)
            }
            WeightInitializer::Normal { std_dev, mean } => match Normal::new(mean, std_dev.abs()) {
                Ok(d) => d.sample(rng),
                Err(_) => mean,
            },
        }
    }
}

/// Stable `(layer, neuron, synapse) -> flat index` mapping, in layer, neuron,
/// synapse order. Solver accumulators are addressed through it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightIndex {
    offsets: Vec<Vec<usize>>,
    layers: Vec<Range<usize>>,
    size: usize,
}

impl WeightIndex {
    pub fn new(n: &Network) -> WeightIndex {
        let mut offsets = Vec::with_capacity(n.layers.len());
        let mut layers = Vec::with_capacity(n.layers.len());
        let mut size = 0;

        for layer in n.layers.iter() {
            let start = size;
            let mut neuron_offsets = Vec::with_capacity(layer.neurons.len());
            for neuron in layer.neurons.iter() {
                neuron_offsets.push(size);
                size += neuron.inputs.len();
            }
            offsets.push(neuron_offsets);
            layers.push(start..size);
        }

        WeightIndex {
            offsets,
            layers,
            size,
        }
    }

    pub fn of(&self, layer: usize, neuron: usize, synapse: usize) -> usize {
        self.offsets[layer][neuron] + synapse
    }

    /// Contiguous flat range owned by each layer.
    pub fn layer_bounds(&self) -> &[Range<usize>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

use std::fmt;

use rand::{thread_rng, Rng};

use crate::error::NetworkError;
use crate::layers::{Layer, Synapse};

use super::{Config, Weights};

/// A fully connected feed-forward network.
///
/// Inputs pass through `(x + shift) * significance` before reaching the first
/// layer. Both vectors start neutral and are only tuned by `NoiseFilter`.
#[derive(Debug)]
pub struct Network {
    pub layers: Vec<Layer>,
    pub config: Config,
    pub significance: Vec<f64>,
    pub shift: Vec<f64>,
}

impl Network {
    pub fn new(config: Config) -> Result<Network, NetworkError> {
        Network::with_rng(config, &mut thread_rng())
    }

    /// Build with weights drawn from `rng`, for reproducible initialization.
    pub fn with_rng<R: Rng + ?Sized>(mut config: Config, rng: &mut R) -> Result<Network, NetworkError> {
        config.validate()?;
        config.loss = Some(config.loss());

        let init = config.weight;
        let mut weight = || init.sample(rng);

        let mut layers = config
            .layout
            .iter()
            .enumerate()
            .map(|(i, width)| Layer::new(*width, config.layer_activation(i), config.custom.clone()))
            .collect::<Vec<Layer>>();

        for i in 0..layers.len() - 1 {
            let (head, tail) = layers.split_at_mut(i + 1);
            head[i].connect(&mut tail[0], &mut weight);
        }

        for neuron in layers[0].neurons.iter_mut() {
            neuron.inputs = (0..config.inputs).map(|_| Synapse::new(weight())).collect();
        }

        for (i, layer) in layers.iter_mut().enumerate() {
            if config.layer_bias(i) {
                layer.apply_bias(&mut weight);
            }
        }

        Ok(Network {
            significance: vec![1.; config.inputs],
            shift: vec![0.; config.inputs],
            layers,
            config,
        })
    }

    /// Run one forward pass. `training` lets activations record what their
    /// derivatives will need during the following backward pass.
    pub fn forward(&mut self, input: &[f64], training: bool) -> Result<(), NetworkError> {
        if input.len() != self.config.inputs {
            return Err(NetworkError::Dimension {
                expected: self.config.inputs,
                actual: input.len(),
            });
        }

        for neuron in self.layers[0].neurons.iter_mut() {
            for (i, x) in input.iter().enumerate() {
                neuron.inputs[i].fire((x + self.shift[i]) * self.significance[i]);
            }
        }

        for layer in self.layers.iter_mut() {
            layer.fire_bias();
        }

        for i in 0..self.layers.len() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            head[i].fire(training);
            if let Some(next) = tail.first_mut() {
                head[i].propagate(next);
            }
        }

        Ok(())
    }

    /// Forward pass in inference mode, returning the output layer's values.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.forward(input, false)?;
        Ok(self.output())
    }

    pub fn output(&self) -> Vec<f64> {
        self.layers
            .last()
            .map(|l| l.values())
            .unwrap_or_default()
    }

    pub fn num_weights(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| l.neurons.iter())
            .map(|n| n.inputs.len())
            .sum()
    }

    /// Bias edges per layer; empty for layers without bias.
    pub fn biases(&self) -> Vec<Vec<&Synapse>> {
        self.layers
            .iter()
            .map(|l| l.neurons.iter().filter_map(|n| n.bias()).collect())
            .collect()
    }

    pub fn weights(&self) -> Weights {
        self.layers
            .iter()
            .map(|l| {
                l.neurons
                    .iter()
                    .map(|n| n.inputs.iter().map(|s| s.weight).collect())
                    .collect()
            })
            .collect()
    }

    /// Overwrite every weight. The shape must match `weights()` exactly.
    pub fn apply_weights(&mut self, weights: &Weights) -> Result<(), NetworkError> {
        if weights.len() != self.layers.len() {
            return Err(NetworkError::Weights(format!(
                "{} layers given, network has {}",
                weights.len(),
                self.layers.len()
            )));
        }

        for (i, (layer, lw)) in self.layers.iter().zip(weights.iter()).enumerate() {
            if lw.len() != layer.neurons.len() {
                return Err(NetworkError::Weights(format!(
                    "layer {}: {} neurons given, expected {}",
                    i,
                    lw.len(),
                    layer.neurons.len()
                )));
            }
            for (j, (neuron, nw)) in layer.neurons.iter().zip(lw.iter()).enumerate() {
                if nw.len() != neuron.inputs.len() {
                    return Err(NetworkError::Weights(format!(
                        "layer {} neuron {}: {} weights given, expected {}",
                        i,
                        j,
                        nw.len(),
                        neuron.inputs.len()
                    )));
                }
            }
        }

        for (layer, lw) in self.layers.iter_mut().zip(weights.iter()) {
            for (neuron, nw) in layer.neurons.iter_mut().zip(lw.iter()) {
                for (s, w) in neuron.inputs.iter_mut().zip(nw.iter()) {
                    s.weight = *w;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layer in self.layers.iter() {
            writeln!(f, "{}", layer)?;
        }
        Ok(())
    }
}

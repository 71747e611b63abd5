use ndarray::Array2;

use crate::error::NetworkError;
use crate::nn::{Network, WeightIndex};

use super::Solver;

/// Backward pass scratch space for one network shape.
///
/// `partial[i][[j, k]]` accumulates the gradient of the weight on synapse `k`
/// into neuron `j` of layer `i`.
#[derive(Debug, Clone)]
pub struct Gradients {
    deltas: Vec<Vec<f64>>,
    pub partial: Vec<Array2<f64>>,
}

impl Gradients {
    pub fn new(n: &Network) -> Gradients {
        let deltas = n.layers.iter().map(|l| vec![0.; l.neurons.len()]).collect();
        let partial = n
            .layers
            .iter()
            .map(|l| {
                let inputs = l.neurons.first().map(|n| n.inputs.len()).unwrap_or(0);
                Array2::zeros((l.neurons.len(), inputs))
            })
            .collect();

        Gradients { deltas, partial }
    }

    pub fn deltas(&self) -> &[Vec<f64>] {
        &self.deltas
    }

    /// Compute every neuron's delta for the last forward pass against `ideal`.
    pub fn calculate_deltas(&mut self, n: &mut Network, ideal: &[f64]) -> Result<(), NetworkError> {
        let last = n.layers.len() - 1;
        if ideal.len() != n.layers[last].neurons.len() {
            return Err(NetworkError::Dimension {
                expected: n.layers[last].neurons.len(),
                actual: ideal.len(),
            });
        }

        let loss = n.config.loss().wake();
        for (i, neuron) in n.layers[last].neurons.iter_mut().enumerate() {
            let value = neuron.value;
            let slope = neuron.d_activate(value);
            self.deltas[last][i] = loss.df(value, ideal[i], slope);
        }

        for i in (0..last).rev() {
            let (head, tail) = n.layers.split_at_mut(i + 1);
            let (d_head, d_tail) = self.deltas.split_at_mut(i + 1);
            let next = &tail[0];
            let next_deltas = &d_tail[0];

            for (j, neuron) in head[i].neurons.iter_mut().enumerate() {
                let sum = next
                    .neurons
                    .iter()
                    .zip(next_deltas.iter())
                    .fold(0., |a, (k, d)| a + k.inputs[j].weight * d);

                let value = neuron.value;
                d_head[i][j] = neuron.d_activate(value) * sum;
            }
        }

        Ok(())
    }

    /// Add `delta * input` for every synapse to the partial gradients.
    pub fn accumulate(&mut self, n: &Network) {
        for ((layer, deltas), partial) in n
            .layers
            .iter()
            .zip(self.deltas.iter())
            .zip(self.partial.iter_mut())
        {
            for (j, (neuron, delta)) in layer.neurons.iter().zip(deltas.iter()).enumerate() {
                for (k, s) in neuron.inputs.iter().enumerate() {
                    partial[[j, k]] += delta * s.input;
                }
            }
        }
    }

    /// Deltas and partial gradients for one training-mode forward pass.
    pub fn backward(&mut self, n: &mut Network, ideal: &[f64]) -> Result<(), NetworkError> {
        self.calculate_deltas(n, ideal)?;
        self.accumulate(n);
        Ok(())
    }

    /// Feed every partial gradient to `solver`, add the deltas to the weights
    /// and clear the partials.
    pub fn apply<S: Solver + ?Sized>(
        &mut self,
        n: &mut Network,
        solver: &mut S,
        index: &WeightIndex,
        iteration: usize,
    ) {
        for (i, (layer, partial)) in n.layers.iter_mut().zip(self.partial.iter_mut()).enumerate() {
            for (j, neuron) in layer.neurons.iter_mut().enumerate() {
                for (k, s) in neuron.inputs.iter_mut().enumerate() {
                    s.weight += solver.update(s.weight, partial[[j, k]], iteration, index.of(i, j, k));
                    partial[[j, k]] = 0.;
                }
            }
        }
    }
}

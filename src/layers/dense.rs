use std::fmt;
use std::sync::Arc;

use crate::activation::{Activations, CustomActivation};
use crate::f::softmax;

use super::{Neuron, Synapse};

/// A fully connected layer. Every neuron shares the layer's activation.
#[derive(Debug)]
pub struct Layer {
    pub neurons: Vec<Neuron>,
    pub activation: Activations,
}

impl Layer {
    pub fn new(
        width: usize,
        activation: Activations,
        custom: Option<Arc<dyn CustomActivation>>,
    ) -> Layer {
        Layer {
            neurons: (0..width)
                .map(|_| Neuron::new(activation.wake(custom.clone())))
                .collect(),
            activation,
        }
    }

    /// Give every neuron of `next` one incoming edge per neuron of this layer.
    pub fn connect(&self, next: &mut Layer, weight: &mut dyn FnMut() -> f64) {
        for _ in self.neurons.iter() {
            for neuron in next.neurons.iter_mut() {
                neuron.inputs.push(Synapse::new(weight()));
            }
        }
    }

    /// Append a trainable constant-input edge to every neuron.
    pub fn apply_bias(&mut self, weight: &mut dyn FnMut() -> f64) {
        for neuron in self.neurons.iter_mut() {
            neuron.inputs.push(Synapse::bias(weight()));
        }
    }

    pub fn has_bias(&self) -> bool {
        self.neurons.iter().any(|n| n.bias().is_some())
    }

    pub fn fire_bias(&mut self) {
        for neuron in self.neurons.iter_mut() {
            for s in neuron.inputs.iter_mut().filter(|s| s.is_bias) {
                s.fire(1.);
            }
        }
    }

    /// Sum and activate every neuron. A softmax layer then normalizes its values.
    pub fn fire(&mut self, training: bool) {
        for neuron in self.neurons.iter_mut() {
            neuron.fire(training);
        }

        if self.activation == Activations::Softmax {
            let normalized = softmax(&self.values());
            for (neuron, v) in self.neurons.iter_mut().zip(normalized) {
                neuron.value = v;
            }
        }
    }

    /// Drive this layer's values into the matching edges of `next`.
    pub fn propagate(&self, next: &mut Layer) {
        for neuron in next.neurons.iter_mut() {
            for (s, upstream) in neuron.inputs.iter_mut().zip(self.neurons.iter()) {
                s.fire(upstream.value);
            }
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.neurons.iter().map(|n| n.value).collect()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.activation)?;
        for neuron in self.neurons.iter() {
            let weights = neuron.inputs.iter().map(|s| s.weight).collect::<Vec<f64>>();
            write!(f, "\n\t{:.4?}", weights)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn constant(w: f64) -> impl FnMut() -> f64 {
        move || w
    }

    #[test]
    fn connect_gives_one_edge_per_upstream_neuron() {
        let a = Layer::new(3, Activations::Linear, None);
        let mut b = Layer::new(2, Activations::Linear, None);

        a.connect(&mut b, &mut constant(0.5));

        assert!(b.neurons.iter().all(|n| n.inputs.len() == 3));
        assert!(!b.has_bias());
    }

    #[test]
    fn bias_edges_fire_with_one() {
        let mut l = Layer::new(2, Activations::Linear, None);
        l.apply_bias(&mut constant(0.25));
        l.fire_bias();
        l.fire(false);

        assert!(l.has_bias());
        assert_eq!(l.values(), vec![0.25, 0.25]);
    }

    #[test]
    fn propagate_feeds_upstream_values_in_order() {
        let mut a = Layer::new(2, Activations::Linear, None);
        let mut b = Layer::new(1, Activations::Linear, None);
        a.connect(&mut b, &mut constant(2.));

        a.neurons[0].value = 1.5;
        a.neurons[1].value = -0.5;
        a.propagate(&mut b);
        b.fire(false);

        assert_eq!(b.neurons[0].inputs[0].input, 1.5);
        assert_eq!(b.neurons[0].inputs[1].input, -0.5);
        assert_eq!(b.values(), vec![2.]);
    }

    #[test]
    fn softmax_layer_normalizes() {
        let mut l = Layer::new(3, Activations::Softmax, None);
        for (i, n) in l.neurons.iter_mut().enumerate() {
            let mut s = Synapse::new(1.);
            s.fire(i as f64);
            n.inputs.push(s);
        }
        l.fire(false);

        assert_relative_eq!(l.values().iter().sum::<f64>(), 1., epsilon = 1e-12);
        assert!(l.values()[2] > l.values()[1]);
    }
}

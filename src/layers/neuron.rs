use std::fmt;

use crate::activation::Differentiable;

use super::Synapse;

/// A node owning its incoming edges.
///
/// Outgoing edges live in the next layer: the edge from neuron `j` to
/// neuron `k` downstream is `next.neurons[k].inputs[j]`.
pub struct Neuron {
    activation: Box<dyn Differentiable>,
    pub inputs: Vec<Synapse>,
    pub value: f64,
}

impl Neuron {
    pub fn new(activation: Box<dyn Differentiable>) -> Neuron {
        Neuron {
            activation,
            inputs: vec![],
            value: 0.,
        }
    }

    pub fn fire(&mut self, training: bool) -> f64 {
        let sum = self.inputs.iter().fold(0., |a, s| a + s.output);
        self.value = self.activate(sum, training);
        self.value
    }

    pub fn activate(&mut self, x: f64, training: bool) -> f64 {
        self.activation.f(x, training)
    }

    pub fn d_activate(&mut self, y: f64) -> f64 {
        self.activation.df(y)
    }

    pub fn bias(&self) -> Option<&Synapse> {
        self.inputs.iter().find(|s| s.is_bias)
    }
}

impl fmt::Debug for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neuron")
            .field("inputs", &self.inputs)
            .field("value", &self.value)
            .finish()
    }
}

use serde::{Deserialize, Serialize};

/// Weighted edge into a neuron. `input` and `output` are scratch values
/// rewritten on every forward pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Synapse {
    pub weight: f64,
    #[serde(skip)]
    pub input: f64,
    #[serde(skip)]
    pub output: f64,
    pub is_bias: bool,
}

impl Synapse {
    pub fn new(weight: f64) -> Synapse {
        Synapse {
            weight,
            input: 0.,
            output: 0.,
            is_bias: false,
        }
    }

    /// A constant-input edge, fired with 1 on every pass.
    pub fn bias(weight: f64) -> Synapse {
        Synapse {
            is_bias: true,
            ..Synapse::new(weight)
        }
    }

    pub fn fire(&mut self, value: f64) {
        self.input = value;
        self.output = self.input * self.weight;
    }
}

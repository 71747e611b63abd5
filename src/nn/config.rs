use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::activation::{Activations, CustomActivation};
use crate::error::NetworkError;
use crate::loss::Losses;

use super::WeightInitializer;

/// Inference mode. Anything but `Default` fixes the output layer's activation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Default,
    /// One-hot classification, softmax output.
    MultiClass,
    /// Linear output, no output bias.
    Regression,
    /// Single sigmoid output.
    Binary,
    /// Independent sigmoid outputs.
    MultiLabel,
}

impl Mode {
    pub fn output_activation(&self) -> Option<Activations> {
        match self {
            Mode::MultiClass => Some(Activations::Softmax),
            Mode::Regression => Some(Activations::Linear),
            Mode::Binary | Mode::MultiLabel => Some(Activations::Sigmoid),
            Mode::Default => None,
        }
    }

    pub fn default_loss(&self) -> Losses {
        match self {
            Mode::MultiClass | Mode::MultiLabel => Losses::CrossEntropy,
            Mode::Binary => Losses::BinaryCrossEntropy,
            _ => Losses::MeanSquared,
        }
    }
}

/// Network topology and training semantics.
///
/// `layout` lists layer widths, the last being the output layer, so
/// `[5, 3, 3]` is two hidden layers of 5 and 3 followed by 3 outputs.
/// `activation` holds one entry per layer, or a single entry shared by all.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    pub inputs: usize,
    pub layout: Vec<usize>,
    pub activation: Vec<Activations>,
    pub mode: Mode,
    pub loss: Option<Losses>,
    pub weight: WeightInitializer,
    pub bias: bool,
    #[serde(skip)]
    pub custom: Option<Arc<dyn CustomActivation>>,
}

impl Config {
    pub fn new(inputs: usize, layout: Vec<usize>) -> Config {
        Config {
            inputs,
            layout,
            activation: vec![Activations::Sigmoid],
            mode: Mode::Default,
            loss: None,
            weight: WeightInitializer::Uniform {
                std_dev: 0.5,
                mean: 0.,
            },
            bias: false,
            custom: None,
        }
    }

    pub fn set_activation(&mut self, activation: Activations) -> &mut Self {
        self.activation = vec![activation];
        self
    }

    pub fn set_activations(&mut self, activations: Vec<Activations>) -> &mut Self {
        self.activation = activations;
        self
    }

    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn set_loss(&mut self, loss: Losses) -> &mut Self {
        self.loss = Some(loss);
        self
    }

    pub fn set_weight(&mut self, weight: WeightInitializer) -> &mut Self {
        self.weight = weight;
        self
    }

    pub fn set_bias(&mut self, bias: bool) -> &mut Self {
        self.bias = bias;
        self
    }

    /// Backs every `Activations::Custom` layer of networks built from this config.
    pub fn set_custom(&mut self, custom: Arc<dyn CustomActivation>) -> &mut Self {
        self.custom = Some(custom);
        self
    }

    pub fn loss(&self) -> Losses {
        self.loss.unwrap_or_else(|| self.mode.default_loss())
    }

    /// Activation of layer `i`, honouring the mode's output activation.
    pub fn layer_activation(&self, i: usize) -> Activations {
        if i == self.layout.len() - 1 {
            if let Some(output) = self.mode.output_activation() {
                return output;
            }
        }

        match self.activation.len() {
            1 => self.activation[0],
            _ => self.activation[i],
        }
    }

    /// Whether layer `i` gets bias edges. Regression leaves the output unbiased.
    pub fn layer_bias(&self, i: usize) -> bool {
        self.bias && !(self.mode == Mode::Regression && i == self.layout.len() - 1)
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.inputs == 0 {
            return Err(NetworkError::Config("network needs at least one input".into()));
        }
        if self.layout.is_empty() {
            return Err(NetworkError::Config("layout is empty".into()));
        }
        if let Some(i) = self.layout.iter().position(|w| *w == 0) {
            return Err(NetworkError::Config(format!("layer {} has no neurons", i)));
        }

        let n = self.activation.len();
        if n != 1 && n != self.layout.len() {
            return Err(NetworkError::Config(format!(
                "{} activations for {} layers",
                n,
                self.layout.len()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_defaults_from_mode() {
        let mut c = Config::new(2, vec![2]);
        assert_eq!(c.loss(), Losses::MeanSquared);
        c.set_mode(Mode::MultiClass);
        assert_eq!(c.loss(), Losses::CrossEntropy);
        c.set_mode(Mode::MultiLabel);
        assert_eq!(c.loss(), Losses::CrossEntropy);
        c.set_mode(Mode::Binary);
        assert_eq!(c.loss(), Losses::BinaryCrossEntropy);
        c.set_loss(Losses::MeanSquared);
        assert_eq!(c.loss(), Losses::MeanSquared);
    }

    #[test]
    fn output_layer_takes_mode_activation() {
        let mut c = Config::new(2, vec![4, 3]);
        c.set_activation(Activations::Relu);
        assert_eq!(c.layer_activation(1), Activations::Relu);

        c.set_mode(Mode::MultiClass);
        assert_eq!(c.layer_activation(0), Activations::Relu);
        assert_eq!(c.layer_activation(1), Activations::Softmax);

        c.set_mode(Mode::Regression);
        assert_eq!(c.layer_activation(1), Activations::Linear);
    }

    #[test]
    fn per_layer_activations() {
        let mut c = Config::new(2, vec![4, 4, 1]);
        c.set_activations(vec![Activations::Tanh, Activations::Mish, Activations::Sigmoid]);
        assert_eq!(c.layer_activation(1), Activations::Mish);
        assert!(c.validate().is_ok());

        c.set_activations(vec![Activations::Tanh, Activations::Mish]);
        assert!(matches!(c.validate(), Err(NetworkError::Config(_))));
    }

    #[test]
    fn regression_output_is_unbiased() {
        let mut c = Config::new(1, vec![3, 1]);
        c.set_bias(true).set_mode(Mode::Regression);
        assert!(c.layer_bias(0));
        assert!(!c.layer_bias(1));
    }

    #[test]
    fn rejects_degenerate_topologies() {
        assert!(Config::new(0, vec![1]).validate().is_err());
        assert!(Config::new(1, vec![]).validate().is_err());
        assert!(Config::new(1, vec![3, 0, 1]).validate().is_err());
    }
}

pub mod activation;
pub mod data;
mod error;
pub mod f;
pub mod layers;
mod loss;
pub mod nn;
pub mod optimizers;

pub use activation::{Activations, CustomActivation, CustomFn};
pub use data::{Example, Examples};
pub use error::NetworkError;
pub use loss::{Loss, Losses};
pub use nn::{Config, Mode, Network, WeightInitializer};
pub use optimizers::{Adam, BatchTrainer, NoiseFilter, OnlineTrainer, Sgd, Solver, Trainer};

pub type Dataset = (Vec<Vec<f64>>, Vec<Vec<f64>>);

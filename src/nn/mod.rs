mod config;
mod network;
mod persist;
mod weights;

pub use config::{Config, Mode};
pub use network::Network;
pub use persist::Dump;
pub use weights::{WeightIndex, WeightInitializer, Weights};

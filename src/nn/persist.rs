use std::error::Error;

use serde::{Deserialize, Serialize};

use super::{Config, Network, Weights};

/// Everything needed to rebuild a trained network. Significance and shift
/// are not part of it; a restored network starts with neutral inputs.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Dump {
    pub config: Config,
    pub weights: Weights,
}

impl Network {
    pub fn snapshot(&self) -> Dump {
        Dump {
            config: self.config.clone(),
            weights: self.weights(),
        }
    }

    pub fn from_snapshot(dump: Dump) -> Result<Network, Box<dyn Error>> {
        let mut n = Network::new(dump.config)?;
        n.apply_weights(&dump.weights)?;
        Ok(n)
    }

    /// JSON encoding of the snapshot.
    pub fn marshal(&self) -> Result<Vec<u8>, Box<dyn Error>> {
        Ok(serde_json::to_vec(&self.snapshot())?)
    }

    pub fn unmarshal(bytes: &[u8]) -> Result<Network, Box<dyn Error>> {
        Network::from_snapshot(serde_json::from_slice(bytes)?)
    }

    /// Compact binary encoding of the snapshot.
    pub fn dump(&self) -> Result<Vec<u8>, Box<dyn Error>> {
        Ok(bincode::serialize(&self.snapshot())?)
    }

    pub fn load(serialized: &[u8]) -> Result<Network, Box<dyn Error>> {
        Network::from_snapshot(bincode::deserialize(serialized)?)
    }
}

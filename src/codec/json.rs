use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::network::Network;

/// One layer as stored in JSON: its learning rate and one weight row per neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub learning_rate: f64,
    pub weights: Vec<Vec<f64>>,
}

/// Human-readable counterpart of the binary model format. Unlike the binary
/// format it keeps per-layer learning rates, so training can resume exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub eps: f64,
    pub max_epochs: usize,
    pub layers: Vec<LayerSnapshot>,
}

impl From<&Network> for NetworkSnapshot {
    fn from(network: &Network) -> Self {
        NetworkSnapshot {
            eps: network.eps(),
            max_epochs: network.max_epochs(),
            layers: network
                .layers()
                .iter()
                .map(|layer| LayerSnapshot {
                    learning_rate: layer.learning_rate(),
                    weights: layer.weight_rows(),
                })
                .collect(),
        }
    }
}

impl NetworkSnapshot {
    /// Validates the snapshot and builds the network it describes.
    pub fn into_network(self) -> Result<Network> {
        let layers = self
            .layers
            .into_iter()
            .map(|l| (l.learning_rate, l.weights))
            .collect();
        Network::assemble(layers, self.eps, self.max_epochs)
    }
}

/// Serializes the network weights to a pretty-printed JSON file.
pub fn save_json<P: AsRef<Path>>(network: &Network, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &NetworkSnapshot::from(network))
        .map_err(std::io::Error::from)?;
    Ok(())
}

/// Deserializes a network from a JSON file previously written by `save_json`.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let snapshot: NetworkSnapshot =
        serde_json::from_reader(reader).map_err(|e| NnError::decoding(e.to_string()))?;
    snapshot.into_network()
}

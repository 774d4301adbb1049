use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::network::network::Network;

/// One entry of a network description.
///
/// Fields:
/// - `size`:          neuron count of the layer, or the input arity for the
///                     first entry
/// - `learning_rate`: step size used by every neuron of the layer; ignored
///                     for the first entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    #[serde(default)]
    pub learning_rate: f64,
}

/// A serializable description of a network architecture plus its stopping rule.
///
/// `NetworkSpec` is the configuration file of the `rivet-nn` binary and can be
/// stored independently of any trained weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used in log lines.
    pub name: String,
    /// Input arity followed by every layer, input → output.
    pub layers: Vec<LayerSpec>,
    /// Convergence threshold on the standard weight error; `0` disables it.
    #[serde(default)]
    pub eps: f64,
    /// Epoch limit; `0` disables it.
    #[serde(default)]
    pub max_epochs: usize,
    /// Seed for weight initialization and shuffling; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkSpec {
    /// Draws fresh weights for the described architecture.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        Network::from_layer_specs(&self.layers, self.eps, self.max_epochs, rng)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(std::io::Error::from)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| NnError::config(format!("invalid network spec '{path}': {e}")))
    }
}

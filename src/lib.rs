pub mod activation;
pub mod codec;
pub mod data;
pub mod error;
pub mod layers;
pub mod network;
pub mod neuron;
pub mod train;

// Convenience re-exports
pub use activation::activation::Sigmoid;
pub use data::records::{Records, Sample};
pub use error::{NnError, Result, TopologyError};
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::spec::{LayerSpec, NetworkSpec};
pub use neuron::neuron::Neuron;
pub use train::{EpochStats, TrainConfig};

use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used across the whole crate.
pub type Result<T> = std::result::Result<T, NnError>;

/// A vector whose length does not fit the network it was handed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// The input vector does not match the arity of the first layer.
    InputSize { got: usize, expected: usize },
    /// The expected-output vector does not match the width of the output layer.
    OutputSize { got: usize, expected: usize },
    /// A neuron's weight vector does not match the width of the layer feeding it.
    WeightCount {
        layer: usize,
        neuron: usize,
        got: usize,
        expected: usize,
    },
}

/// The crate's error type.
#[derive(Debug)]
pub enum NnError {
    Topology(TopologyError),
    /// Invalid network shape, hyperparameter or stopping rule.
    Configuration(String),
    /// A model stream that is truncated or declares inconsistent counts.
    Decoding(String),
    /// A dataset that could not be parsed.
    Csv(String),
    Io(io::Error),
}

impl NnError {
    pub fn config(msg: impl Into<String>) -> Self {
        NnError::Configuration(msg.into())
    }

    pub fn decoding(msg: impl Into<String>) -> Self {
        NnError::Decoding(msg.into())
    }
}

impl Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::InputSize { got, expected } => {
                write!(f, "input size error: got {got} values, the first layer expects {expected}")
            }
            TopologyError::OutputSize { got, expected } => write!(
                f,
                "expected output size error: got {got} values, the output layer has {expected} neurons"
            ),
            TopologyError::WeightCount {
                layer,
                neuron,
                got,
                expected,
            } => write!(
                f,
                "neuron {neuron} of layer {layer} has {got} weights, expected {expected}"
            ),
        }
    }
}

impl Display for NnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NnError::Topology(e) => write!(f, "topology error: {e}"),
            NnError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            NnError::Decoding(msg) => write!(f, "decoding error: {msg}"),
            NnError::Csv(msg) => write!(f, "dataset error: {msg}"),
            NnError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for TopologyError {}

impl Error for NnError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NnError::Topology(e) => Some(e),
            NnError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TopologyError> for NnError {
    fn from(e: TopologyError) -> Self {
        NnError::Topology(e)
    }
}

impl From<io::Error> for NnError {
    fn from(e: io::Error) -> Self {
        NnError::Io(e)
    }
}

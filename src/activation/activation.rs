use std::f64::consts::E;

/// The logistic sigmoid, the only activation used by the network.
///
/// Both the forward pass and the backward pass go through this type so the
/// derivative always matches the function that produced the cached output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sigmoid;

impl Sigmoid {
    /// σ(x) = 1 / (1 + e^-x)
    pub fn function(x: f64) -> f64 {
        1.0 / (1.0 + E.powf(-x))
    }

    /// σ'(x) written in terms of the activation `y = σ(x)`: y·(1 − y).
    ///
    /// Neurons only cache their output, so the backward pass never needs the
    /// pre-activation sum.
    pub fn derivative_from_output(y: f64) -> f64 {
        y * (1.0 - y)
    }
}

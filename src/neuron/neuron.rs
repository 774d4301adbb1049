use crate::{activation::Sigmoid, layers::dense::Layer};

/// One neuron, borrowed out of its layer's flat storage.
///
/// `weights` holds one weight per input followed by the bias weight, which is
/// paired with an implicit constant input of `1`. `output` and `gradient` are
/// overwritten by every forward/backward pass. `square_error` collects the
/// squared weight steps of every `update` since the layer last cleared it.
#[derive(Debug)]
pub struct Neuron<'a> {
    weights: &'a mut [f64],
    output: &'a mut f64,
    gradient: &'a mut f64,
    square_error: &'a mut f64,
    learning_rate: f64,
}

impl<'a> Neuron<'a> {
    pub(crate) fn new(
        weights: &'a mut [f64],
        output: &'a mut f64,
        gradient: &'a mut f64,
        square_error: &'a mut f64,
        learning_rate: f64,
    ) -> Neuron<'a> {
        Neuron {
            weights,
            output,
            gradient,
            square_error,
            learning_rate,
        }
    }

    /// Computes and caches `σ(Σ w[k]·x[k] + w[bias])`.
    ///
    /// `inputs.len() + 1 == self.size()` is the caller's responsibility; the
    /// network checks arity before any neuron is touched.
    pub fn cal(&mut self, inputs: &[f64]) -> f64 {
        debug_assert_eq!(inputs.len() + 1, self.weights.len());
        let bias = self.weights.len() - 1;
        let sum: f64 = self.weights[..bias]
            .iter()
            .zip(inputs)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.weights[bias];
        *self.output = Sigmoid::function(sum);
        *self.output
    }

    /// Output-layer gradient: (output − expected) · σ'(output).
    pub fn cal_output_gradient(&mut self, expected: f64) -> f64 {
        let out = *self.output;
        *self.gradient = (out - expected) * Sigmoid::derivative_from_output(out);
        *self.gradient
    }

    /// Hidden-layer gradient: σ'(output) · Σ_k next[k].gradient · next[k].w[index].
    ///
    /// `next` must already hold finalized gradients for the current sample.
    pub fn cal_hidden_gradient(&mut self, next: &Layer, index: usize) -> f64 {
        let downstream: f64 = (0..next.size())
            .map(|k| next.gradient(k) * next.weight(k, index))
            .sum();
        *self.gradient = Sigmoid::derivative_from_output(*self.output) * downstream;
        *self.gradient
    }

    /// One online gradient-descent step using the cached gradient.
    pub fn update(&mut self, inputs: &[f64]) {
        debug_assert_eq!(inputs.len() + 1, self.weights.len());
        let scale = self.learning_rate * *self.gradient;
        let bias = self.weights.len() - 1;
        let mut squared = 0.0;
        for (w, x) in self.weights[..bias].iter_mut().zip(inputs) {
            let step = scale * x;
            *w -= step;
            squared += step * step;
        }
        self.weights[bias] -= scale;
        squared += scale * scale;
        *self.square_error += squared;
    }

    /// Sum of squared weight steps accumulated since the last reset.
    pub fn cal_square_error(&self) -> f64 {
        *self.square_error
    }

    /// Number of weights, bias included.
    pub fn size(&self) -> usize {
        self.weights.len()
    }

    pub fn output(&self) -> f64 {
        *self.output
    }

    pub fn gradient(&self) -> f64 {
        *self.gradient
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights[..]
    }
}

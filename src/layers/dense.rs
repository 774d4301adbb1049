use rand::Rng;

use crate::neuron::Neuron;

/// A fully-connected layer stored as one flat arena.
///
/// Neuron `j` owns `weights[j * (inputs + 1) .. (j + 1) * (inputs + 1)]`; the
/// last slot of each row is the bias weight. `outputs`, `gradients` and
/// `square_errors` hold one value per neuron.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    inputs: usize,
    size: usize,
    learning_rate: f64,
    weights: Vec<f64>,
    outputs: Vec<f64>,
    gradients: Vec<f64>,
    square_errors: Vec<f64>,
}

impl Layer {
    /// `size` neurons fed by `inputs` values, weights drawn uniformly from [-1, 1).
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        inputs: usize,
        learning_rate: f64,
        rng: &mut R,
    ) -> Layer {
        let weights = (0..size * (inputs + 1))
            .map(|_| rng.gen::<f64>() * 2.0 - 1.0)
            .collect();
        Layer::with_weights(size, inputs, learning_rate, weights)
    }

    /// Builds a layer from one weight row per neuron.
    ///
    /// Rows must already be checked to share the same non-zero length.
    pub(crate) fn from_rows(rows: &[Vec<f64>], learning_rate: f64) -> Layer {
        let width = rows.first().map_or(1, Vec::len);
        let weights = rows.iter().flatten().copied().collect();
        Layer::with_weights(rows.len(), width - 1, learning_rate, weights)
    }

    fn with_weights(size: usize, inputs: usize, learning_rate: f64, weights: Vec<f64>) -> Layer {
        Layer {
            inputs,
            size,
            learning_rate,
            weights,
            outputs: vec![0.0; size],
            gradients: vec![0.0; size],
            square_errors: vec![0.0; size],
        }
    }

    /// Number of neurons.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of values each neuron consumes, bias excluded.
    pub fn input_size(&self) -> usize {
        self.inputs
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Total weight count of the layer, biases included.
    pub fn weight_count(&self) -> usize {
        self.weights.len()
    }

    fn row(&self, neuron: usize) -> std::ops::Range<usize> {
        let width = self.inputs + 1;
        neuron * width..(neuron + 1) * width
    }

    /// Weight row of one neuron, bias last.
    pub fn neuron_weights(&self, neuron: usize) -> &[f64] {
        &self.weights[self.row(neuron)]
    }

    /// Weight connecting input `input` to neuron `neuron`.
    pub fn weight(&self, neuron: usize, input: usize) -> f64 {
        self.weights[neuron * (self.inputs + 1) + input]
    }

    pub fn gradient(&self, neuron: usize) -> f64 {
        self.gradients[neuron]
    }

    /// Cached outputs from the last forward pass.
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    /// Mutable view of one neuron.
    pub fn neuron(&mut self, neuron: usize) -> Neuron<'_> {
        let row = self.row(neuron);
        Neuron::new(
            &mut self.weights[row],
            &mut self.outputs[neuron],
            &mut self.gradients[neuron],
            &mut self.square_errors[neuron],
            self.learning_rate,
        )
    }

    /// Runs every neuron on `input`. Arity is checked by the caller.
    pub fn feed_from(&mut self, input: &[f64]) {
        for j in 0..self.size {
            self.neuron(j).cal(input);
        }
    }

    pub fn output_gradients(&mut self, expected: &[f64]) {
        for (j, &target) in expected.iter().enumerate() {
            self.neuron(j).cal_output_gradient(target);
        }
    }

    /// `next` is the layer consuming this layer's outputs; its gradients
    /// must be finalized for the current sample.
    pub fn hidden_gradients(&mut self, next: &Layer) {
        for j in 0..self.size {
            self.neuron(j).cal_hidden_gradient(next, j);
        }
    }

    /// Applies one update to every neuron using the input the layer saw
    /// during the last forward pass.
    pub fn update_from(&mut self, input: &[f64]) {
        for j in 0..self.size {
            self.neuron(j).update(input);
        }
    }

    /// Sum of the neurons' accumulated squared weight steps.
    pub fn square_error(&self) -> f64 {
        self.square_errors.iter().sum()
    }

    pub fn reset_square_errors(&mut self) {
        self.square_errors.iter_mut().for_each(|e| *e = 0.0);
    }

    /// Weights regrouped as one row per neuron.
    pub fn weight_rows(&self) -> Vec<Vec<f64>> {
        self.weights
            .chunks(self.inputs + 1)
            .map(<[f64]>::to_vec)
            .collect()
    }
}

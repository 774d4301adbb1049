use std::fmt;
use std::path::Path;

use rand::Rng;

use crate::{
    codec,
    data::Records,
    error::{NnError, Result, TopologyError},
    layers::dense::Layer,
    network::spec::LayerSpec,
    train::{loop_fn::train_loop, train_config::TrainConfig},
};

/// A fully-connected feedforward network trained by online backpropagation.
///
/// `layers[0]` is the first hidden layer; raw input values are consumed by it
/// directly. `eps` and `max_epochs` form the stopping rule of `train`, where
/// `0` disables the respective criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
    eps: f64,
    max_epochs: usize,
    last_input: Vec<f64>,
}

impl Network {
    /// Builds a network from a shape such as `[2, 2, 1]`: `shape[0]` is the
    /// input arity, every later entry the neuron count of one layer.
    pub fn new<R: Rng + ?Sized>(
        shape: &[usize],
        learning_rate: f64,
        eps: f64,
        max_epochs: usize,
        rng: &mut R,
    ) -> Result<Network> {
        let specs: Vec<LayerSpec> = shape
            .iter()
            .map(|&size| LayerSpec { size, learning_rate })
            .collect();
        Network::from_layer_specs(&specs, eps, max_epochs, rng)
    }

    /// Builds a network from per-layer `(size, learning_rate)` entries.
    /// `specs[0]` only describes the input arity; its learning rate is unused.
    pub fn from_layer_specs<R: Rng + ?Sized>(
        specs: &[LayerSpec],
        eps: f64,
        max_epochs: usize,
        rng: &mut R,
    ) -> Result<Network> {
        check_stopping(eps, max_epochs)?;
        if specs.len() < 2 {
            return Err(NnError::config(format!(
                "a network needs an input size and at least one layer, got {} entries",
                specs.len()
            )));
        }
        if let Some(pos) = specs.iter().position(|s| s.size == 0) {
            return Err(NnError::config(format!("layer entry {pos} has zero neurons")));
        }

        for (pos, pair) in specs.windows(2).enumerate() {
            pair[0]
                .size
                .checked_add(1)
                .and_then(|width| width.checked_mul(pair[1].size))
                .ok_or_else(|| {
                    NnError::config(format!("layer {pos} has too many weights to address"))
                })?;
        }

        let mut layers = Vec::with_capacity(specs.len() - 1);
        for pair in specs.windows(2) {
            check_learning_rate(pair[1].learning_rate)?;
            layers.push(Layer::new(pair[1].size, pair[0].size, pair[1].learning_rate, rng));
        }
        Ok(Network::from_parts(layers, eps, max_epochs))
    }

    /// Builds a network from an existing weight matrix indexed
    /// `[layer][neuron][weight]`, bias last in every row.
    pub fn from_weights(
        weights: Vec<Vec<Vec<f64>>>,
        learning_rate: f64,
        eps: f64,
        max_epochs: usize,
    ) -> Result<Network> {
        let layers = weights.into_iter().map(|rows| (learning_rate, rows)).collect();
        Network::assemble(layers, eps, max_epochs)
    }

    /// Validates and builds a network from `(learning_rate, rows)` per layer.
    pub(crate) fn assemble(
        layers: Vec<(f64, Vec<Vec<f64>>)>,
        eps: f64,
        max_epochs: usize,
    ) -> Result<Network> {
        check_stopping(eps, max_epochs)?;
        if layers.is_empty() {
            return Err(NnError::config("a network needs at least one layer"));
        }

        let mut expected = match layers[0].1.first() {
            Some(row) if row.len() >= 2 => row.len(),
            Some(_) => {
                return Err(NnError::config(
                    "the first layer must consume at least one input",
                ))
            }
            None => return Err(NnError::config("layer 0 has zero neurons")),
        };

        let mut built = Vec::with_capacity(layers.len());
        for (index, (learning_rate, rows)) in layers.iter().enumerate() {
            check_learning_rate(*learning_rate)?;
            if rows.is_empty() {
                return Err(NnError::config(format!("layer {index} has zero neurons")));
            }
            for (neuron, row) in rows.iter().enumerate() {
                if row.len() != expected {
                    return Err(TopologyError::WeightCount {
                        layer: index,
                        neuron,
                        got: row.len(),
                        expected,
                    }
                    .into());
                }
            }
            built.push(Layer::from_rows(rows, *learning_rate));
            expected = rows.len() + 1;
        }
        Ok(Network::from_parts(built, eps, max_epochs))
    }

    fn from_parts(layers: Vec<Layer>, eps: f64, max_epochs: usize) -> Network {
        Network {
            layers,
            eps,
            max_epochs,
            last_input: Vec::new(),
        }
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn max_epochs(&self) -> usize {
        self.max_epochs
    }

    /// Replaces the stopping rule, e.g. before resuming training of a loaded model.
    pub fn set_stopping(&mut self, eps: f64, max_epochs: usize) -> Result<()> {
        check_stopping(eps, max_epochs)?;
        self.eps = eps;
        self.max_epochs = max_epochs;
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Arity of the input vector, inferred from the first layer.
    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    /// Width of the output layer.
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size()
    }

    /// Input arity followed by each layer's neuron count.
    pub fn shape(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.layers.iter().map(Layer::size))
            .collect()
    }

    /// Total weight count, biases included.
    pub fn weight_count(&self) -> usize {
        self.layers.iter().map(Layer::weight_count).sum()
    }

    /// Copy of every weight as `[layer][neuron][weight]`.
    pub fn weights(&self) -> Vec<Vec<Vec<f64>>> {
        self.layers.iter().map(Layer::weight_rows).collect()
    }

    /// Feeds `input` through every layer, caching each neuron's output.
    ///
    /// On an arity mismatch nothing is touched: the outputs of the previous
    /// successful call stay in place.
    pub fn forward(&mut self, input: &[f64]) -> Result<()> {
        let expected = self.input_size();
        if input.len() != expected {
            return Err(TopologyError::InputSize {
                got: input.len(),
                expected,
            }
            .into());
        }

        self.layers[0].feed_from(input);
        for i in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            rest[0].feed_from(done[i - 1].outputs());
        }

        self.last_input.clear();
        self.last_input.extend_from_slice(input);
        Ok(())
    }

    /// Computes every gradient for `expected`, then updates every weight.
    ///
    /// Must follow a successful `forward` for the same sample.
    pub fn back_prop(&mut self, expected: &[f64]) -> Result<()> {
        let width = self.output_size();
        if expected.len() != width {
            return Err(TopologyError::OutputSize {
                got: expected.len(),
                expected: width,
            }
            .into());
        }
        if self.last_input.len() != self.input_size() {
            return Err(NnError::config("back_prop called before any forward pass"));
        }

        let last = self.layers.len() - 1;
        self.layers[last].output_gradients(expected);

        // Gradients of layer i + 1 are final before layer i reads them.
        for i in (0..last).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            head[i].hidden_gradients(&tail[0]);
        }

        // Cached outputs are not touched by updates, so every layer still
        // sees the input it was fed during the forward pass.
        for i in (1..=last).rev() {
            let (head, tail) = self.layers.split_at_mut(i);
            tail[0].update_from(head[i - 1].outputs());
        }
        self.layers[0].update_from(&self.last_input);
        Ok(())
    }

    /// Cached outputs of one layer, `None` if the index is out of range.
    pub fn get_output(&self, layer: usize) -> Option<&[f64]> {
        self.layers.get(layer).map(Layer::outputs)
    }

    /// Cached outputs of the output layer.
    pub fn output(&self) -> &[f64] {
        self.layers[self.layers.len() - 1].outputs()
    }

    /// Runs a forward pass and returns a copy of the output vector.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input)?;
        Ok(self.output().to_vec())
    }

    /// Predicted class of `input`: the arg-max of the output vector, or for a
    /// single-output network `1` when the output reaches 0.5 and `0` otherwise.
    pub fn classify(&mut self, input: &[f64]) -> Result<usize> {
        self.forward(input)?;
        Ok(predicted_class(self.output()))
    }

    /// RMS of the weight steps taken since the last epoch boundary,
    /// normalized by the total weight count.
    pub fn cal_standard_error(&self) -> f64 {
        let error: f64 = self.layers.iter().map(Layer::square_error).sum();
        (error / self.weight_count() as f64).sqrt()
    }

    pub(crate) fn reset_square_errors(&mut self) {
        self.layers.iter_mut().for_each(Layer::reset_square_errors);
    }

    /// Fraction of `data` whose predicted class differs from its label.
    pub fn sample_error(&mut self, data: &Records) -> Result<f64> {
        if data.is_empty() {
            return Err(NnError::config("cannot measure the error of an empty dataset"));
        }
        let mut wrong = 0usize;
        for sample in data.iter() {
            if self.classify(&sample.input)? != sample.id {
                wrong += 1;
            }
        }
        Ok(wrong as f64 / data.len() as f64)
    }

    /// Trains on `data` until the stopping rule fires and returns the final
    /// in-sample misclassification rate. See [`train_loop`].
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        data: &Records,
        rng: &mut R,
        config: &TrainConfig,
    ) -> Result<f64> {
        train_loop(self, data, rng, config)
    }

    /// Misclassification rate on held-out data; no weight is updated.
    pub fn test(&mut self, data: &Records) -> Result<f64> {
        self.sample_error(data)
    }

    /// Writes the network in the binary model format to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        codec::model::encode(self, &mut writer)?;
        std::io::Write::flush(&mut writer)?;
        Ok(())
    }

    /// Reads a network written by `save`; every layer gets `learning_rate`.
    pub fn load<P: AsRef<Path>>(path: P, learning_rate: f64) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let mut reader = std::io::BufReader::new(file);
        codec::model::decode(&mut reader, learning_rate)
    }

    /// Serializes the network, learning rates included, to pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        codec::json::save_json(self, path)
    }

    /// Deserializes a network previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        codec::json::load_json(path)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network:")?;
        writeln!(f, "eps: {}", self.eps)?;
        writeln!(f, "N: {}", self.max_epochs)?;
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(
                f,
                "Layer {} ({} neurons, learning rate {}):",
                i + 1,
                layer.size(),
                layer.learning_rate()
            )?;
            for j in 0..layer.size() {
                writeln!(f, "  {:?}", layer.neuron_weights(j))?;
            }
        }
        Ok(())
    }
}

pub(crate) fn predicted_class(output: &[f64]) -> usize {
    if let [single] = output {
        return usize::from(*single >= 0.5);
    }
    output
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn check_learning_rate(learning_rate: f64) -> Result<()> {
    if learning_rate.is_finite() && learning_rate > 0.0 {
        Ok(())
    } else {
        Err(NnError::config(format!(
            "learning rate must be a positive finite number, got {learning_rate}"
        )))
    }
}

fn check_stopping(eps: f64, max_epochs: usize) -> Result<()> {
    if !(eps.is_finite() && eps >= 0.0) {
        return Err(NnError::config(format!(
            "eps must be a non-negative finite number, got {eps}"
        )));
    }
    if max_epochs > i32::MAX as usize {
        return Err(NnError::config(format!(
            "max epochs {max_epochs} does not fit the model format"
        )));
    }
    Ok(())
}

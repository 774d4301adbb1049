use std::sync::mpsc;

use crate::train::epoch_stats::EpochStats;

/// Reporting options for a `train_loop` run. The stopping rule itself lives
/// on the network (`eps`, `max_epochs`) so it is persisted with the model.
///
/// # Fields
/// - `verbose`:     log one line per epoch at `info` level instead of `debug`
/// - `progress_tx`: optional channel sender; one `EpochStats` is sent per
///                   completed epoch. A dropped receiver does not stop training.
#[derive(Debug, Clone, Default)]
pub struct TrainConfig {
    pub verbose: bool,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with no progress channel.
    pub fn new(verbose: bool) -> Self {
        TrainConfig {
            verbose,
            progress_tx: None,
        }
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }
}

use log::{debug, info, log, Level};
use rand::Rng;

use crate::data::Records;
use crate::error::{NnError, Result};
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` online, one sample at a time, and returns the in-sample
/// misclassification rate once the stopping rule fires.
///
/// # Stopping rule
/// At the end of every epoch the standard weight error is measured:
/// - `eps > 0`: training stops as soon as it falls below `eps`;
/// - `max_epochs > 0`: training stops once that many epochs have run.
///
/// Having both disabled is a configuration error rather than an endless loop.
///
/// # Arguments
/// - `network`: trained in place; `eps` and `max_epochs` are read from it
/// - `data`:    training set; copied so the caller's order is left alone
/// - `rng`:     source of the per-epoch reshuffle
/// - `config`:  logging verbosity and optional progress channel
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    data: &Records,
    rng: &mut R,
    config: &TrainConfig,
) -> Result<f64> {
    let eps = network.eps();
    let max_epochs = network.max_epochs();
    if eps <= 0.0 && max_epochs == 0 {
        return Err(NnError::config(
            "both stopping criteria are disabled (eps = 0 and max epochs = 0)",
        ));
    }
    if data.is_empty() {
        return Err(NnError::config("cannot train on an empty dataset"));
    }

    let mut data = data.clone();
    let report = config.verbose || config.progress_tx.is_some();
    let level = if config.verbose { Level::Info } else { Level::Debug };
    let mut epoch = 0usize;

    loop {
        let weight_error = run_one_epoch(network, &data)?;
        epoch += 1;

        if report {
            let sample_error = network.sample_error(&data)?;
            log!(
                level,
                "epoch = {}, weight error = {:.6}, Ein = {:.4}",
                epoch,
                weight_error,
                sample_error
            );
            if let Some(ref tx) = config.progress_tx {
                // A dropped receiver only stops the reporting.
                let _ = tx.send(EpochStats {
                    epoch,
                    weight_error,
                    sample_error,
                });
            }
        } else {
            debug!("epoch = {}, weight error = {:.6}", epoch, weight_error);
        }

        if eps > 0.0 && weight_error < eps {
            info!("converged after {epoch} epochs (weight error {weight_error:.6} < {eps})");
            break;
        }
        if max_epochs > 0 && epoch >= max_epochs {
            info!("stopped after {epoch} epochs (weight error {weight_error:.6})");
            break;
        }

        data.shuffle(rng);
    }

    network.sample_error(&data)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One online pass over `data` in its current order.
/// Returns the standard weight error of the pass.
fn run_one_epoch(network: &mut Network, data: &Records) -> Result<f64> {
    network.reset_square_errors();
    for sample in data {
        network.forward(&sample.input)?;
        network.back_prop(&sample.output)?;
    }
    Ok(network.cal_standard_error())
}

//! rivet-nn command-line trainer
//!
//! Run with:
//!   rivet-nn <network.json> <train.csv> [test.csv] [model.bin]
//!
//! `network.json` is a `NetworkSpec`; CSV rows are `x1,...,xn,class`.
//! Per-epoch progress is logged at `info`; filter with `RUST_LOG`.

use std::process::ExitCode;

use log::{error, info};
use rand::{rngs::StdRng, SeedableRng};

use rivet_nn::{NetworkSpec, Records, Result, TrainConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 4 {
        eprintln!("usage: rivet-nn <network.json> <train.csv> [test.csv] [model.bin]");
        return ExitCode::from(2);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let spec = NetworkSpec::load_json(&args[0])?;
    let mut rng = match spec.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = spec.build(&mut rng)?;
    info!("built '{}' with shape {:?}", spec.name, network.shape());

    let classes = network.output_size();
    let train = Records::from_csv(&std::fs::read(&args[1])?, classes)?;
    info!("loaded {} training samples from {}", train.len(), args[1]);

    let ein = network.train(&train, &mut rng, &TrainConfig::new(true))?;
    info!("training misclassification rate: {ein:.4}");

    if let Some(path) = args.get(2) {
        let test = Records::from_csv(&std::fs::read(path)?, classes)?;
        let eout = network.test(&test)?;
        info!("test misclassification rate on {} samples: {eout:.4}", test.len());
    }

    if let Some(path) = args.get(3) {
        network.save(path)?;
        info!("model written to {path}");
    }
    Ok(())
}

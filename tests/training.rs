use std::sync::mpsc;

use rand::{rngs::StdRng, Rng, SeedableRng};

use rivet_nn::{EpochStats, Network, NnError, Records, Sample, TopologyError, TrainConfig};

fn and_records() -> Records {
    Records::from_samples(vec![
        Sample::labeled(vec![0.0, 0.0], 0, 1),
        Sample::labeled(vec![0.0, 1.0], 0, 1),
        Sample::labeled(vec![1.0, 0.0], 0, 1),
        Sample::labeled(vec![1.0, 1.0], 1, 1),
    ])
}

/// 2-D points labeled by the sign of `x + y`, kept away from the boundary.
fn separable_records(rng: &mut StdRng, n: usize) -> Records {
    let mut records = Records::new();
    while records.len() < n {
        let x: f64 = rng.gen_range(-1.0..1.0);
        let y: f64 = rng.gen_range(-1.0..1.0);
        if (x + y).abs() < 0.1 {
            continue;
        }
        let class = usize::from(x + y > 0.0);
        records.push(Sample::labeled(vec![x, y], class, 2));
    }
    records
}

fn collect_stats(
    network: &mut Network,
    data: &Records,
    rng: &mut StdRng,
) -> (f64, Vec<EpochStats>) {
    let (tx, rx) = mpsc::channel();
    let config = TrainConfig::new(false).with_progress(tx);
    let ein = network.train(data, rng, &config).unwrap();
    drop(config);
    (ein, rx.iter().collect())
}

#[test]
fn and_gate_converges_before_the_epoch_limit() {
    for seed in [1u64, 7, 2024] {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut network = Network::new(&[2, 2, 1], 0.5, 0.01, 1000, &mut rng).unwrap();
        let data = and_records();

        let (ein, stats) = collect_stats(&mut network, &data, &mut rng);

        assert_eq!(ein, 0.0, "seed {seed}");
        assert!(stats.len() < 1000, "seed {seed} ran {} epochs", stats.len());
        let last = stats.last().unwrap();
        assert!(last.weight_error < 0.01);
        assert_eq!(network.test(&data).unwrap(), 0.0);
    }
}

#[test]
fn single_epoch_budget_runs_exactly_one_epoch() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut network = Network::new(&[2, 2, 1], 0.5, 0.0, 1, &mut rng).unwrap();
    let data = and_records();

    let (ein, stats) = collect_stats(&mut network, &data, &mut rng);

    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].epoch, 1);
    assert_eq!(ein, stats[0].sample_error);
    assert_eq!(ein, network.test(&data).unwrap());
}

#[test]
fn weight_error_trends_down_on_separable_data() {
    let mut rng = StdRng::seed_from_u64(17);
    let data = separable_records(&mut rng, 40);
    let mut network = Network::new(&[2, 3, 2], 0.5, 0.0, 50, &mut rng).unwrap();

    let (ein, stats) = collect_stats(&mut network, &data, &mut rng);

    assert_eq!(stats.len(), 50);
    let first = stats[0].weight_error;
    let last = stats[stats.len() - 1].weight_error;
    assert!(last <= first, "first {first}, last {last}");
    assert!(ein <= 0.1, "Ein {ein}");
}

#[test]
fn evaluation_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(21);
    let data = separable_records(&mut rng, 30);
    let mut network = Network::new(&[2, 4, 2], 0.3, 0.0, 5, &mut rng).unwrap();
    network.train(&data, &mut rng, &TrainConfig::default()).unwrap();

    let weights = network.weights();
    let first = network.test(&data).unwrap();
    let second = network.test(&data).unwrap();
    assert_eq!(first, second);
    assert_eq!(network.weights(), weights);
}

#[test]
fn training_resumes_from_a_weight_matrix() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut network = Network::new(&[2, 2, 1], 0.5, 0.0, 20, &mut rng).unwrap();
    network.train(&and_records(), &mut rng, &TrainConfig::default()).unwrap();

    let mut resumed = Network::from_weights(network.weights(), 0.5, 0.0, 20).unwrap();
    assert_eq!(resumed.shape(), network.shape());
    assert_eq!(
        resumed.predict(&[1.0, 1.0]).unwrap(),
        network.predict(&[1.0, 1.0]).unwrap()
    );
    resumed.set_stopping(0.0, 5).unwrap();
    resumed.train(&and_records(), &mut rng, &TrainConfig::default()).unwrap();
    assert_ne!(resumed.weights(), network.weights());
}

#[test]
fn output_width_matches_last_layer_for_any_input() {
    let mut rng = StdRng::seed_from_u64(5);
    for shape in [vec![1, 1], vec![3, 5, 2], vec![4, 3, 3, 6]] {
        let mut network = Network::new(&shape, 0.1, 0.0, 1, &mut rng).unwrap();
        for _ in 0..10 {
            let input: Vec<f64> = (0..shape[0]).map(|_| rng.gen_range(-5.0..5.0)).collect();
            network.forward(&input).unwrap();
            let last = network.layer_count() - 1;
            let out = network.get_output(last).unwrap();
            assert_eq!(out.len(), *shape.last().unwrap());
            assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}

#[test]
fn wrong_input_size_keeps_previous_outputs() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut network = Network::new(&[3, 4, 2], 0.1, 0.0, 1, &mut rng).unwrap();
    network.forward(&[0.1, 0.2, 0.3]).unwrap();
    let hidden = network.get_output(0).unwrap().to_vec();
    let output = network.output().to_vec();

    let err = network.forward(&[0.1, 0.2]).unwrap_err();
    assert!(matches!(
        err,
        NnError::Topology(TopologyError::InputSize { got: 2, expected: 3 })
    ));
    assert_eq!(network.get_output(0).unwrap(), hidden.as_slice());
    assert_eq!(network.output(), output.as_slice());
}

#[test]
fn error_kinds_are_distinct() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut network = Network::new(&[2, 2], 0.1, 0.0, 1, &mut rng).unwrap();

    let input_err = network.forward(&[1.0]).unwrap_err();
    network.forward(&[1.0, 0.0]).unwrap();
    let output_err = network.back_prop(&[1.0]).unwrap_err();
    let config_err = Network::new(&[2], 0.1, 0.0, 1, &mut rng).unwrap_err();

    assert!(matches!(input_err, NnError::Topology(TopologyError::InputSize { .. })));
    assert!(matches!(output_err, NnError::Topology(TopologyError::OutputSize { .. })));
    assert!(matches!(config_err, NnError::Configuration(_)));
}

use rand::{rngs::StdRng, SeedableRng};

use rivet_nn::{Network, Records, Sample, TrainConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data = Records::from_samples(vec![
        Sample::labeled(vec![0.0, 0.0], 0, 1),
        Sample::labeled(vec![0.0, 1.0], 0, 1),
        Sample::labeled(vec![1.0, 0.0], 0, 1),
        Sample::labeled(vec![1.0, 1.0], 1, 1),
    ]);

    let mut rng = StdRng::seed_from_u64(2024);
    let mut network = Network::new(&[2, 2, 1], 0.5, 0.01, 1000, &mut rng)
        .expect("valid network shape");

    let ein = network
        .train(&data, &mut rng, &TrainConfig::new(true))
        .expect("training succeeds");
    println!("Ein = {ein}");

    for sample in &data {
        let out = network.predict(&sample.input).expect("input arity matches");
        println!("Input: {:?} -> Output: {:.4}", sample.input, out[0]);
    }
    print!("{network}");
}

use bayes_corr::config::{DatasetConfig, NormalPrior, SamplerConfig};
use bayes_corr::dataset::generate_dataset;
use bayes_corr::estimate::estimate;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn main() {
    let mut rng = SmallRng::seed_from_u64(42);
    let config = DatasetConfig {
        n: 50,
        rho: 0.5,
        ..Default::default()
    };
    let data = generate_dataset(config, &mut rng).unwrap();

    // Tune for 1,000 steps, then record 10,000 draws of r
    let sampler = SamplerConfig::default().set_seed(42);
    let trace = estimate(&data, NormalPrior::default(), sampler).unwrap();

    assert_eq!(trace.len(), 10_000);
    assert!(trace.iter().all(|rec| rec.values()[0].abs() < 1.0));
    println!("posterior mean of r: {:.3}", trace.column("r").unwrap().mean().unwrap());
}

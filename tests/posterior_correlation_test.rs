//! End-to-end checks: simulate a dataset, sample the posterior of its
//! correlation, and compare the trace with what the prior and data imply.

use bayes_corr::config::{DatasetConfig, NormalPrior, SamplerConfig};
use bayes_corr::dataset::{dataset_sampler, Sample};
use bayes_corr::estimate::{estimate, estimate_all, estimate_uniform, estimate_weighted, Variant};
use bayes_corr::stats::{pearson, summarize};
use rand::{rngs::SmallRng, SeedableRng};

const SEED: u64 = 42;

/// Draws a dataset with sample correlation within 0.001 of `rho`, moving on
/// to the next seed if a search comes back empty.
fn dataset(n: usize, rho: f64) -> Sample {
    let config = DatasetConfig {
        n,
        rho,
        ..Default::default()
    };
    (SEED..SEED + 10)
        .find_map(|seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            dataset_sampler(config, &mut rng).unwrap()
        })
        .expect("Expected one of ten rejection searches to succeed")
}

fn sampler_config() -> SamplerConfig {
    SamplerConfig {
        n_tune: 1_000,
        n_draws: 10_000,
        ..Default::default()
    }
    .set_seed(SEED)
}

#[test]
fn test_bounded_normal_posterior_shrinks_towards_prior() {
    let data = dataset(50, 0.5);
    let r_obs = pearson(&data).unwrap();
    assert!((r_obs - 0.5).abs() < 0.001);

    let prior = NormalPrior { mean: 0.0, sd: 0.1 };
    let trace = estimate(&data, prior, sampler_config()).unwrap();
    assert_eq!(trace.len(), 10_000);

    let mean = trace.column("r").unwrap().mean().unwrap();
    assert!(
        prior.mean < mean && mean < r_obs,
        "posterior mean {mean} not between prior mean {} and r = {r_obs}",
        prior.mean
    );
}

#[test]
fn test_shrinkage_weakens_as_sample_grows() {
    let prior = NormalPrior { mean: 0.0, sd: 0.1 };
    let small = estimate(&dataset(50, 0.5), prior, sampler_config()).unwrap();
    let large = estimate(&dataset(500, 0.5), prior, sampler_config()).unwrap();

    let small_mean = small.column("r").unwrap().mean().unwrap();
    let large_mean = large.column("r").unwrap().mean().unwrap();
    assert!(
        (0.5 - large_mean).abs() < (0.5 - small_mean).abs(),
        "n = 500 mean {large_mean} is not closer to 0.5 than n = 50 mean {small_mean}"
    );
}

#[test]
fn test_uniform_posterior_centers_on_sample_correlation() {
    let data = dataset(200, 0.3);
    let trace = estimate_uniform(&data, sampler_config()).unwrap();
    let summary = &summarize(&trace, 0.95)[0];
    assert_eq!(summary.name, "r");
    assert!((summary.mean - 0.3).abs() < 0.08, "mean {}", summary.mean);
    assert!(summary.lower < 0.3 && 0.3 < summary.upper);
}

#[test]
fn test_every_trace_entry_stays_in_support() {
    let data = dataset(20, -0.6);
    let prior = NormalPrior::default();
    for (variant, trace) in estimate_all(&data, prior, sampler_config()).unwrap() {
        assert_eq!(trace.len(), 10_000, "{}", variant.name());
        for rec in trace.iter() {
            let r = rec.get("r").unwrap();
            assert!(r > -1.0 && r < 1.0, "{}: r = {r}", variant.name());
            if let Some(w) = rec.get("w") {
                assert!(w > 0.0, "{}: w = {w}", variant.name());
            }
        }
    }
}

#[test]
fn test_weighted_model_learns_prior_width() {
    // A strong correlation is unlikely under sd 0.1, so the weight should
    // move above its starting value of 1 to widen the prior.
    let data = dataset(100, 0.7);
    let trace = estimate_weighted(&data, NormalPrior::default(), sampler_config()).unwrap();
    assert_eq!(trace.names(), &["r", "w"]);
    let w_mean = trace.column("w").unwrap().mean().unwrap();
    assert!(w_mean > 1.0, "w mean {w_mean}");
}

#[test]
fn test_acceptance_rate_in_plausible_band() {
    let data = dataset(50, 0.5);
    let prior = NormalPrior::default();
    for (variant, trace) in estimate_all(&data, prior, sampler_config()).unwrap() {
        let rate = trace.acceptance_rate();
        assert!(
            (0.15..=0.7).contains(&rate),
            "{} acceptance rate {rate}",
            variant.name()
        );
    }
}

#[test]
fn test_fixed_seed_reproduces_trace() {
    let data = dataset(30, 0.2);
    let prior = NormalPrior::default();
    let first = estimate_all(&data, prior, sampler_config()).unwrap();
    let second = estimate_all(&data, prior, sampler_config()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.iter().map(|(v, _)| *v).collect::<Vec<_>>(),
        Variant::ALL.to_vec()
    );
}

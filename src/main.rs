//! Simulates a small correlated sample and compares the posterior of its
//! correlation under the three priors.

use bayes_corr::config::{DatasetConfig, NormalPrior, SamplerConfig};
use bayes_corr::dataset::dataset_sampler;
use bayes_corr::estimate::estimate_all;
use bayes_corr::stats::{pearson, summarize};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::error::Error;

#[cfg(feature = "csv")]
use bayes_corr::io::csv::save_trace_csv;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    const SEED: u64 = 42;

    let dataset = DatasetConfig {
        n: 50,
        rho: 0.5,
        ..Default::default()
    };
    let mut rng = SmallRng::seed_from_u64(SEED);
    let Some(data) = dataset_sampler(dataset, &mut rng)? else {
        println!(
            "No dataset with r within {} of {} after {} draws",
            dataset.tolerance, dataset.rho, dataset.max_iter
        );
        return Ok(());
    };
    println!(
        "Observed n = {}, r = {:.4}",
        data.nrows(),
        pearson(&data).unwrap_or(f64::NAN)
    );

    let prior = NormalPrior::default();
    let config = SamplerConfig {
        progress: true,
        ..Default::default()
    }
    .set_seed(SEED);

    for (variant, trace) in estimate_all(&data, prior, config)? {
        println!(
            "\n{} prior ({} draws, acceptance {:.2})",
            variant.name(),
            trace.len(),
            trace.acceptance_rate()
        );
        for s in summarize(&trace, 0.95) {
            println!(
                "  {:>2}: mean {:.4}  sd {:.4}  95% [{:.4}, {:.4}]",
                s.name, s.mean, s.sd, s.lower, s.upper
            );
        }

        #[cfg(feature = "csv")]
        {
            let filename = format!("trace_{}.csv", variant.name());
            save_trace_csv(&trace, &filename)?;
            println!("  saved trace to {filename}");
        }
    }

    Ok(())
}

/*!
Simulated paired samples.

[`generate_dataset`] draws one bivariate normal sample and centers it exactly.
[`dataset_sampler`] repeats that draw until the sample correlation lands
within a tolerance of the population value, so that small samples can be
built with a known empirical correlation.

# Examples

```rust
use bayes_corr::config::DatasetConfig;
use bayes_corr::dataset::dataset_sampler;
use rand::{rngs::SmallRng, SeedableRng};

let mut rng = SmallRng::seed_from_u64(7);
let config = DatasetConfig { n: 1000, rho: 0.0, ..Default::default() };
let data = dataset_sampler(config, &mut rng).unwrap();
assert!(data.is_some());
```
*/

use nalgebra as na;
use ndarray::{Array2, Axis};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::DatasetConfig;
use crate::error::{invalid, Result};
use crate::stats::pearson;

/// An n×2 sample, one (x, y) pair per row.
pub type Sample = Array2<f64>;

/// Covariance matrix built from standard deviations and a correlation.
pub(crate) fn covariance(sigma: [f64; 2], rho: f64) -> na::Matrix2<f64> {
    let cov_xy = rho * sigma[0] * sigma[1];
    na::Matrix2::new(sigma[0] * sigma[0], cov_xy, cov_xy, sigma[1] * sigma[1])
}

/**
Draws `config.n` pairs from a bivariate normal with the configured mean,
standard deviations and correlation, then subtracts the realized column means
so the returned sample has exactly zero mean.

Only `n`, `mean`, `sigma` and `rho` are read from `config`.

# Errors

[`Error::InvalidParameters`](crate::error::Error::InvalidParameters) when
`n <= 1`, a standard deviation is not positive, or `|rho| >= 1`.
*/
pub fn generate_dataset<R: Rng + ?Sized>(config: DatasetConfig, rng: &mut R) -> Result<Sample> {
    config.validate()?;
    let chol = na::Cholesky::new(covariance(config.sigma, config.rho))
        .ok_or_else(|| invalid("covariance matrix is not positive definite"))?;
    let l = chol.l();
    let mean = na::Vector2::from(config.mean);

    let mut xy = Array2::<f64>::zeros((config.n, 2));
    for mut row in xy.axis_iter_mut(Axis(0)) {
        let z: na::Vector2<f64> =
            na::Vector2::new(rng.sample(StandardNormal), rng.sample(StandardNormal));
        let v = l * z + mean;
        row[0] = v[0];
        row[1] = v[1];
    }

    // force centering
    let realized = xy
        .mean_axis(Axis(0))
        .ok_or_else(|| invalid("cannot center an empty sample"))?;
    xy -= &realized;
    Ok(xy)
}

/**
Draws datasets until one has a sample correlation within `config.tolerance`
of `config.rho`, trying at most `config.max_iter` times.

Returns `Ok(None)` if no draw qualified. The caller may retry with other
parameters or a looser tolerance.
*/
pub fn dataset_sampler<R: Rng + ?Sized>(
    config: DatasetConfig,
    rng: &mut R,
) -> Result<Option<Sample>> {
    config.validate()?;
    for i in 0..config.max_iter {
        let dat = generate_dataset(config, rng)?;
        let Some(corr) = pearson(&dat) else {
            continue;
        };
        if (corr - config.rho).abs() < config.tolerance {
            log::info!(
                "found dataset with r = {corr:.5} (target {}) after {} draws",
                config.rho,
                i + 1
            );
            return Ok(Some(dat));
        }
    }
    log::warn!(
        "no dataset within {} of rho = {} after {} draws",
        config.tolerance,
        config.rho,
        config.max_iter
    );
    Ok(None)
}

//! Configuration structures for dataset generation, priors and the sampler.
//!
//! Every entry point takes one of these by value. The `Default` impls carry
//! the values the estimation pipeline is normally run with.

use rand::{thread_rng, Rng};

use crate::error::{invalid, Result};

/// Parameters of a simulated bivariate normal dataset and of the rejection
/// search that picks one whose sample correlation is close to `rho`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetConfig {
    /// Number of (x, y) pairs.
    pub n: usize,
    /// Population mean. The generated sample is re-centered regardless.
    pub mean: [f64; 2],
    /// Population standard deviations of x and y.
    pub sigma: [f64; 2],
    /// Population correlation.
    pub rho: f64,
    /// Maximum accepted |r - rho| in the rejection search.
    pub tolerance: f64,
    /// Number of draws the rejection search tries before giving up.
    pub max_iter: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            n: 10,
            mean: [0.0, 0.0],
            sigma: [1.0, 1.0],
            rho: 0.0,
            tolerance: 0.001,
            max_iter: 1000,
        }
    }
}

impl DatasetConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.n <= 1 {
            return Err(invalid(format!("sample size must exceed 1, got {}", self.n)));
        }
        if self.sigma.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(invalid(format!(
                "standard deviations must be positive, got {:?}",
                self.sigma
            )));
        }
        if !(self.rho.abs() < 1.0) {
            return Err(invalid(format!(
                "correlation must lie in (-1, 1), got {}",
                self.rho
            )));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(invalid(format!("mean must be finite, got {:?}", self.mean)));
        }
        Ok(())
    }
}

/// Normal prior over the correlation, truncated to (-1, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalPrior {
    pub mean: f64,
    pub sd: f64,
}

impl Default for NormalPrior {
    fn default() -> Self {
        Self { mean: 0.0, sd: 0.1 }
    }
}

impl NormalPrior {
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(invalid(format!("prior mean must be finite, got {}", self.mean)));
        }
        if !self.sd.is_finite() || self.sd <= 0.0 {
            return Err(invalid(format!("prior sd must be positive, got {}", self.sd)));
        }
        Ok(())
    }
}

/**
Settings of a single Metropolis run.

| field           | default  |
|-----------------|----------|
| `n_tune`        | 1000     |
| `n_draws`       | 10000    |
| `tune_interval` | 100      |
| `initial_scale` | 1.0      |
| `min_scale`     | 1e-6     |
| `max_scale`     | 100.0    |
| `seed`          | random   |
| `progress`      | false    |

# Examples

```rust
use bayes_corr::config::SamplerConfig;

let config = SamplerConfig::default().set_seed(42);
assert_eq!(config.seed, 42);
assert_eq!(config.n_draws, 10_000);
```
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    /// Tuning iterations, discarded from the trace.
    pub n_tune: usize,
    /// Sampling iterations, one trace record each.
    pub n_draws: usize,
    /// Length of the window over which the acceptance rate is measured
    /// before the step sizes are rescaled.
    pub tune_interval: usize,
    /// Starting step size of every parameter.
    pub initial_scale: f64,
    /// Lower clamp for adapted step sizes.
    pub min_scale: f64,
    /// Upper clamp for adapted step sizes.
    pub max_scale: f64,
    /// Seed of the chain's random number generator.
    pub seed: u64,
    /// Draw a progress bar while sampling.
    pub progress: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            n_tune: 1000,
            n_draws: 10_000,
            tune_interval: 100,
            initial_scale: 1.0,
            min_scale: 1e-6,
            max_scale: 100.0,
            seed: thread_rng().gen::<u64>(),
            progress: false,
        }
    }
}

impl SamplerConfig {
    /// Returns the configuration with `seed` replaced.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tune_interval == 0 {
            return Err(invalid("tune_interval must be at least 1"));
        }
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 {
            return Err(invalid(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if !self.max_scale.is_finite() || self.max_scale < self.min_scale {
            return Err(invalid(format!(
                "max_scale must be finite and >= min_scale, got {}",
                self.max_scale
            )));
        }
        if !(self.min_scale..=self.max_scale).contains(&self.initial_scale) {
            return Err(invalid(format!(
                "initial_scale {} outside [{}, {}]",
                self.initial_scale, self.min_scale, self.max_scale
            )));
        }
        Ok(())
    }
}

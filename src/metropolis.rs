/*!
# Adaptive Random-Walk Metropolis Sampler

This module implements a random-walk Metropolis sampler for any target that
implements [`Target`]. A run goes through three phases:

- **Tuning**: `n_tune` iterations. Every `tune_interval` iterations the
  acceptance rate of the finished window rescales the per-parameter step sizes.
  These iterations are not recorded.
- **Sampling**: `n_draws` iterations starting from the last tuning state, each
  one recorded in the [`Trace`] (a rejected proposal repeats the previous state).
- **Terminal**: the trace has been handed to the caller. Further calls to
  [`MetropolisSampler::sample`] return an empty trace.

Proposals with an undefined density (NaN, `-inf`, or `+inf`) are rejected, so
every recorded state lies inside the support of the target.

## Example Usage

```rust
use bayes_corr::config::SamplerConfig;
use bayes_corr::distributions::Target;
use bayes_corr::metropolis::MetropolisSampler;

struct HalfNormal;

impl Target for HalfNormal {
    fn unnorm_log_prob(&self, theta: &[f64]) -> f64 {
        if theta[0] <= 0.0 {
            return f64::NEG_INFINITY;
        }
        -0.5 * theta[0] * theta[0]
    }
}

let config = SamplerConfig { n_tune: 500, n_draws: 2_000, ..Default::default() }.set_seed(42);
let mut sampler = MetropolisSampler::new(HalfNormal, &["x"], &[1.0], config).unwrap();
let trace = sampler.sample();
assert_eq!(trace.len(), 2_000);
assert!(trace.iter().all(|rec| rec.values()[0] > 0.0));
```
*/

use indicatif::ProgressBar;
use rand::prelude::*;

use crate::config::SamplerConfig;
use crate::core::{advance_chain, progress_bar, run_chain, MarkovChain};
use crate::distributions::{ScaledGaussian, Target};
use crate::error::{invalid, Result};
use crate::trace::Trace;

/// Step-size multiplier for a window acceptance rate.
///
/// Very low rates shrink the step hard, very high rates grow it hard, and
/// rates between 0.2 and 0.5 leave it untouched.
pub fn tune_factor(acc_rate: f64) -> f64 {
    if acc_rate < 0.001 {
        0.1
    } else if acc_rate < 0.05 {
        0.5
    } else if acc_rate < 0.2 {
        0.9
    } else if acc_rate > 0.95 {
        10.0
    } else if acc_rate > 0.75 {
        2.0
    } else if acc_rate > 0.5 {
        1.1
    } else {
        1.0
    }
}

/// Phase of a [`MetropolisSampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Tuning,
    Sampling,
    Terminal,
}

/// Maps undefined densities to `-inf` so they are always rejected.
fn sanitize(lp: f64) -> f64 {
    if lp.is_nan() || lp == f64::INFINITY {
        f64::NEG_INFINITY
    } else {
        lp
    }
}

/**
A single random-walk Metropolis chain.

Holds the current position and its log-density, the proposal step sizes, the
acceptance counters of the running tuning window, and a chain-specific random
number generator seeded from [`SamplerConfig::seed`].
*/
#[derive(Debug, Clone)]
pub struct MetropolisChain<D> {
    /// The target distribution to sample from.
    pub target: D,
    /// The proposal distribution holding the per-parameter step sizes.
    pub proposal: ScaledGaussian,
    /// The current state of the chain.
    pub current_state: Vec<f64>,
    current_lp: f64,
    /// Whether steps currently feed the step-size adaptation.
    pub tuning: bool,
    tune_interval: usize,
    min_scale: f64,
    max_scale: f64,
    window_steps: usize,
    window_accepted: usize,
    n_steps: usize,
    n_accepted: usize,
    /// The chain-specific random seed.
    pub seed: u64,
    /// The random number generator for this chain.
    pub rng: SmallRng,
}

impl<D: Target> MetropolisChain<D> {
    /**
    Creates a chain at `initial_state` with every step size set to
    `config.initial_scale`.

    # Errors

    [`Error::InvalidParameters`](crate::error::Error::InvalidParameters) if the
    configuration is invalid, the initial state is empty, or the target has
    no finite density at the initial state.
    */
    pub fn new(target: D, initial_state: &[f64], config: &SamplerConfig) -> Result<Self> {
        config.validate()?;
        if initial_state.is_empty() {
            return Err(invalid("initial state has no parameters"));
        }
        let current_lp = sanitize(target.unnorm_log_prob(initial_state));
        if !current_lp.is_finite() {
            return Err(invalid(format!(
                "target density is undefined at the initial state {initial_state:?}"
            )));
        }
        Ok(Self {
            target,
            proposal: ScaledGaussian::new(vec![config.initial_scale; initial_state.len()]),
            current_state: initial_state.to_vec(),
            current_lp,
            tuning: false,
            tune_interval: config.tune_interval,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            window_steps: 0,
            window_accepted: 0,
            n_steps: 0,
            n_accepted: 0,
            seed: config.seed,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// Log-density of the current state.
    pub fn current_log_prob(&self) -> f64 {
        self.current_lp
    }

    /// Fraction of accepted proposals over the chain's lifetime.
    pub fn acceptance_rate(&self) -> f64 {
        if self.n_steps == 0 {
            return 0.0;
        }
        self.n_accepted as f64 / self.n_steps as f64
    }

    /// Clears the lifetime acceptance counters, keeping position and step sizes.
    pub fn reset_counters(&mut self) {
        self.n_steps = 0;
        self.n_accepted = 0;
    }

    /// Closes the current tuning window if it is full.
    fn adapt(&mut self) {
        if self.window_steps < self.tune_interval {
            return;
        }
        let acc_rate = self.window_accepted as f64 / self.window_steps as f64;
        let factor = tune_factor(acc_rate);
        self.proposal.rescale(factor, self.min_scale, self.max_scale);
        log::debug!(
            "tuning window: acceptance {:.3}, factor {}, scales {:?}",
            acc_rate,
            factor,
            self.proposal.scales
        );
        self.window_steps = 0;
        self.window_accepted = 0;
    }
}

impl<D: Target> MarkovChain<f64> for MetropolisChain<D> {
    /**
    Performs one Metropolis update.

    A candidate is drawn from the symmetric proposal, so the acceptance ratio
    in log-space reduces to

    \[
    \log \alpha = \log p(\text{proposed}) - \log p(\text{current})
    \]

    The candidate is accepted if \(\log(\text{Uniform}(0,1)) < \log \alpha\).
    A candidate with undefined density has \(\log \alpha = -\infty\) and is
    never accepted.
    */
    fn step(&mut self) -> bool {
        let proposed = self.proposal.sample(&self.current_state, &mut self.rng);
        let proposed_lp = sanitize(self.target.unnorm_log_prob(&proposed));
        let log_accept_ratio = proposed_lp - self.current_lp;
        let u: f64 = self.rng.gen();
        let accepted = u.ln() < log_accept_ratio;
        if accepted {
            self.current_state = proposed;
            self.current_lp = proposed_lp;
        }

        self.n_steps += 1;
        self.n_accepted += accepted as usize;
        if self.tuning {
            self.window_steps += 1;
            self.window_accepted += accepted as usize;
            self.adapt();
        }
        accepted
    }

    fn current_state(&self) -> &[f64] {
        &self.current_state
    }
}

/**
Drives a [`MetropolisChain`] through tuning and sampling.

# Examples

```rust
use bayes_corr::config::SamplerConfig;
use bayes_corr::distributions::Target;
use bayes_corr::metropolis::{MetropolisSampler, Phase};

struct Gauss;
impl Target for Gauss {
    fn unnorm_log_prob(&self, theta: &[f64]) -> f64 {
        -0.5 * theta[0] * theta[0]
    }
}

let config = SamplerConfig { n_tune: 200, n_draws: 100, ..Default::default() };
let mut sampler = MetropolisSampler::new(Gauss, &["x"], &[0.0], config).unwrap();
assert_eq!(sampler.phase(), Phase::Tuning);
sampler.tune();
assert_eq!(sampler.phase(), Phase::Sampling);
assert_eq!(sampler.sample().len(), 100);
assert_eq!(sampler.phase(), Phase::Terminal);
```
*/
#[derive(Clone)]
pub struct MetropolisSampler<D> {
    pub chain: MetropolisChain<D>,
    names: Vec<&'static str>,
    config: SamplerConfig,
    phase: Phase,
    pb: Option<ProgressBar>,
}

impl<D: Target> MetropolisSampler<D> {
    /// Creates a sampler in the tuning phase.
    ///
    /// `names` labels the trace columns and must have one entry per
    /// coordinate of `initial_state`.
    pub fn new(
        target: D,
        names: &[&'static str],
        initial_state: &[f64],
        config: SamplerConfig,
    ) -> Result<Self> {
        if names.len() != initial_state.len() {
            return Err(invalid(format!(
                "{} parameter names for a state of dimension {}",
                names.len(),
                initial_state.len()
            )));
        }
        let chain = MetropolisChain::new(target, initial_state, &config)?;
        Ok(Self {
            chain,
            names: names.to_vec(),
            config,
            phase: Phase::Tuning,
            pb: None,
        })
    }

    /// Reports progress on `pb` instead of a bar of the sampler's own. The
    /// bar is used whether or not [`SamplerConfig::progress`] is set.
    pub fn with_progress_bar(mut self, pb: ProgressBar) -> Self {
        pb.set_length((self.config.n_tune + self.config.n_draws) as u64);
        self.pb = Some(pb);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Current step sizes of the proposal.
    pub fn scales(&self) -> &[f64] {
        &self.chain.proposal.scales
    }

    fn progress(&mut self) -> Option<ProgressBar> {
        if self.pb.is_none() && self.config.progress {
            self.pb = Some(progress_bar(
                (self.config.n_tune + self.config.n_draws) as u64,
                format!("seed {}", self.config.seed),
            ));
        }
        self.pb.clone()
    }

    /// Runs the tuning phase if it has not run yet. Afterwards the sampler is
    /// in [`Phase::Sampling`].
    pub fn tune(&mut self) {
        let pb = self.progress();
        self.tune_with(pb.as_ref());
    }

    fn tune_with(&mut self, pb: Option<&ProgressBar>) {
        if self.phase != Phase::Tuning {
            return;
        }
        log::info!("tuning for {} iterations", self.config.n_tune);
        self.chain.tuning = true;
        advance_chain(&mut self.chain, self.config.n_tune, pb);
        self.chain.tuning = false;
        log::info!(
            "tuning finished: acceptance {:.3}, scales {:?}",
            self.chain.acceptance_rate(),
            self.chain.proposal.scales
        );
        self.chain.reset_counters();
        self.phase = Phase::Sampling;
    }

    /// Runs whatever remains of tuning, then the sampling phase, and returns
    /// the trace with exactly `n_draws` records.
    ///
    /// The sampler is then in [`Phase::Terminal`], and any later call returns
    /// a trace with no records.
    pub fn sample(&mut self) -> Trace {
        if self.phase == Phase::Terminal {
            return Trace::new(self.names.iter().copied());
        }
        let pb = self.progress();
        if self.phase == Phase::Tuning {
            self.tune_with(pb.as_ref());
        }
        log::info!("sampling for {} iterations", self.config.n_draws);
        let trace = run_chain(&mut self.chain, &self.names, self.config.n_draws, pb.as_ref());
        if let Some(pb) = pb {
            pb.finish_with_message("Done!");
        }
        self.phase = Phase::Terminal;
        log::info!(
            "sampling finished: {} draws, acceptance {:.3}",
            trace.len(),
            trace.acceptance_rate()
        );
        trace
    }
}

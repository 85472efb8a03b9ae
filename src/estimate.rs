/*!
Posterior estimation of the correlation of an observed sample under each of
the three priors.

[`estimate_all`] runs the three models side by side with rayon. Every run owns
its chain and random number generator; run `i` is seeded with `seed + i`.
*/

use indicatif::{MultiProgress, ProgressBar};
use rayon::prelude::*;

use crate::config::{NormalPrior, SamplerConfig};
use crate::core::progress_bar;
use crate::dataset::Sample;
use crate::error::{invalid, Result};
use crate::metropolis::MetropolisSampler;
use crate::models::{BoundedNormal, Posterior, PosteriorModel, Uniform, WeightedNormal};
use crate::trace::Trace;

/// Which prior a trace was produced under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    BoundedNormal,
    Uniform,
    WeightedNormal,
}

impl Variant {
    pub const ALL: [Variant; 3] = [
        Variant::BoundedNormal,
        Variant::Uniform,
        Variant::WeightedNormal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::BoundedNormal => "bounded-normal",
            Variant::Uniform => "uniform",
            Variant::WeightedNormal => "weighted-normal",
        }
    }

    /// Builds the model of this variant. `prior` is ignored by
    /// [`Variant::Uniform`].
    pub fn model(&self, prior: NormalPrior) -> Result<Box<dyn PosteriorModel>> {
        Ok(match self {
            Variant::BoundedNormal => Box::new(BoundedNormal::new(prior)?),
            Variant::Uniform => Box::new(Uniform),
            Variant::WeightedNormal => Box::new(WeightedNormal::new(prior)?),
        })
    }
}

fn check_data(data: &Sample) -> Result<()> {
    if data.ncols() != 2 {
        return Err(invalid(format!(
            "expected an n x 2 sample, got {} columns",
            data.ncols()
        )));
    }
    if data.nrows() <= 1 {
        return Err(invalid(format!(
            "sample size must exceed 1, got {}",
            data.nrows()
        )));
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(invalid("sample contains non-finite values"));
    }
    Ok(())
}

/// Samples the posterior of `model` given `data`, starting from the model's
/// initial parameters.
pub fn sample_posterior<M: PosteriorModel + ?Sized>(
    model: &M,
    data: &Sample,
    config: SamplerConfig,
) -> Result<Trace> {
    run_model(model, data, config, None)
}

fn run_model<M: PosteriorModel + ?Sized>(
    model: &M,
    data: &Sample,
    config: SamplerConfig,
    pb: Option<ProgressBar>,
) -> Result<Trace> {
    check_data(data)?;
    let target = Posterior::new(model, data);
    let mut sampler = MetropolisSampler::new(
        target,
        model.param_names(),
        &model.initial_params(),
        config,
    )?;
    if let Some(pb) = pb {
        sampler = sampler.with_progress_bar(pb);
    }
    Ok(sampler.sample())
}

/// Posterior of `r` under the truncated normal prior.
pub fn estimate(data: &Sample, prior: NormalPrior, config: SamplerConfig) -> Result<Trace> {
    sample_posterior(&BoundedNormal::new(prior)?, data, config)
}

/// Posterior of `r` under the uniform prior.
pub fn estimate_uniform(data: &Sample, config: SamplerConfig) -> Result<Trace> {
    sample_posterior(&Uniform, data, config)
}

/// Joint posterior of `r` and the prior weight `w`.
pub fn estimate_weighted(
    data: &Sample,
    prior: NormalPrior,
    config: SamplerConfig,
) -> Result<Trace> {
    sample_posterior(&WeightedNormal::new(prior)?, data, config)
}

/// Runs all three variants in parallel. Results come back in the order of
/// [`Variant::ALL`].
///
/// With [`SamplerConfig::progress`] set, every run reports on its own line of
/// a shared multi-progress display.
pub fn estimate_all(
    data: &Sample,
    prior: NormalPrior,
    config: SamplerConfig,
) -> Result<Vec<(Variant, Trace)>> {
    check_data(data)?;
    let models = Variant::ALL
        .iter()
        .map(|v| -> Result<_> { Ok((*v, v.model(prior)?)) })
        .collect::<Result<Vec<_>>>()?;
    let multi = config.progress.then(MultiProgress::new);
    let len = (config.n_tune + config.n_draws) as u64;

    models
        .par_iter()
        .enumerate()
        .map(|(i, (variant, model))| {
            let run_config = config.set_seed(config.seed.wrapping_add(i as u64));
            let pb = multi
                .as_ref()
                .map(|m| m.add(progress_bar(len, variant.name())));
            log::info!("estimating {} model", variant.name());
            run_model(&**model, data, run_config, pb).map(|trace| (*variant, trace))
        })
        .collect()
}

/*!
Posterior models for the correlation of a centered, z-scored bivariate sample.

Every model combines a prior over the correlation `r` (and, for
[`WeightedNormal`], a weight `w` that scales the prior width) with the
bivariate normal likelihood of the observed rows under mean `(0, 0)` and unit
standard deviations.

# Examples

```rust
use bayes_corr::config::NormalPrior;
use bayes_corr::models::{BoundedNormal, Posterior, PosteriorModel};
use bayes_corr::distributions::Target;
use ndarray::array;

let data = array![[0.5, 0.4], [-0.5, -0.6], [1.0, 0.9], [-1.0, -0.7]];
let model = BoundedNormal::new(NormalPrior::default()).unwrap();
assert_eq!(model.param_names(), &["r"]);

let posterior = Posterior::new(&model, &data);
assert!(posterior.unnorm_log_prob(&[0.3]).is_finite());
assert_eq!(posterior.unnorm_log_prob(&[1.0]), f64::NEG_INFINITY);
```
*/

use crate::config::NormalPrior;
use crate::dataset::Sample;
use crate::distributions::{truncated_normal_ln_pdf, uniform_ln_pdf, Precision, Target};
use crate::error::Result;

/// Standard deviations assumed for the observed variables.
pub const UNIT_SIGMA: [f64; 2] = [1.0, 1.0];

/// Support of the prior on the weight of [`WeightedNormal`].
pub const WEIGHT_BOUNDS: (f64, f64) = (0.01, 20.0);

const RHO_BOUNDS: (f64, f64) = (-1.0, 1.0);

/// A prior plus likelihood over a small vector of named parameters.
pub trait PosteriorModel: Send + Sync {
    /// Names of the free parameters, in the order `log_density` reads them.
    fn param_names(&self) -> &'static [&'static str];

    /// A point with finite density where chains start.
    fn initial_params(&self) -> Vec<f64>;

    /// Unnormalized log posterior density of `params` given `data`.
    ///
    /// Returns `-inf` outside the support, including every correlation with
    /// `|r| >= 1`, and when `params` or `data` have the wrong shape.
    fn log_density(&self, params: &[f64], data: &Sample) -> f64;
}

/// Log-likelihood of the rows of `data` under correlation `rho`, or `-inf`
/// when the precision matrix is undefined or `data` is not n×2.
pub fn log_likelihood(rho: f64, data: &Sample) -> f64 {
    if data.ncols() != 2 {
        return f64::NEG_INFINITY;
    }
    match Precision::new(UNIT_SIGMA, rho) {
        Some(p) => p.mvn_ln_pdf_rows(data.view()),
        None => f64::NEG_INFINITY,
    }
}

/// Adds the likelihood only where the prior is finite.
fn combine(log_prior: f64, rho: f64, data: &Sample) -> f64 {
    if log_prior == f64::NEG_INFINITY || log_prior.is_nan() {
        return f64::NEG_INFINITY;
    }
    log_prior + log_likelihood(rho, data)
}

fn start_rho(mean: f64) -> f64 {
    mean.clamp(-0.99, 0.99)
}

/// Normal prior on `r`, truncated to (-1, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedNormal {
    pub prior: NormalPrior,
}

impl BoundedNormal {
    pub fn new(prior: NormalPrior) -> Result<Self> {
        prior.validate()?;
        Ok(Self { prior })
    }
}

impl PosteriorModel for BoundedNormal {
    fn param_names(&self) -> &'static [&'static str] {
        &["r"]
    }

    fn initial_params(&self) -> Vec<f64> {
        vec![start_rho(self.prior.mean)]
    }

    fn log_density(&self, params: &[f64], data: &Sample) -> f64 {
        let &[rho] = params else {
            return f64::NEG_INFINITY;
        };
        let (lo, hi) = RHO_BOUNDS;
        let lp = truncated_normal_ln_pdf(rho, self.prior.mean, self.prior.sd, lo, hi);
        combine(lp, rho, data)
    }
}

/// Flat prior on `r` over (-1, 1).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Uniform;

impl PosteriorModel for Uniform {
    fn param_names(&self) -> &'static [&'static str] {
        &["r"]
    }

    fn initial_params(&self) -> Vec<f64> {
        vec![0.0]
    }

    fn log_density(&self, params: &[f64], data: &Sample) -> f64 {
        let &[rho] = params else {
            return f64::NEG_INFINITY;
        };
        let (lo, hi) = RHO_BOUNDS;
        let lp = if rho > lo && rho < hi {
            0.0
        } else {
            f64::NEG_INFINITY
        };
        combine(lp, rho, data)
    }
}

/// Truncated normal prior on `r` whose standard deviation is `w * prior.sd`,
/// with `w ~ Uniform(0.01, 20)` inferred jointly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedNormal {
    pub prior: NormalPrior,
}

impl WeightedNormal {
    pub fn new(prior: NormalPrior) -> Result<Self> {
        prior.validate()?;
        Ok(Self { prior })
    }
}

impl PosteriorModel for WeightedNormal {
    fn param_names(&self) -> &'static [&'static str] {
        &["r", "w"]
    }

    fn initial_params(&self) -> Vec<f64> {
        vec![start_rho(self.prior.mean), 1.0]
    }

    fn log_density(&self, params: &[f64], data: &Sample) -> f64 {
        let &[rho, w] = params else {
            return f64::NEG_INFINITY;
        };
        let (w_lo, w_hi) = WEIGHT_BOUNDS;
        let lp_w = uniform_ln_pdf(w, w_lo, w_hi);
        if lp_w == f64::NEG_INFINITY {
            return f64::NEG_INFINITY;
        }
        let (lo, hi) = RHO_BOUNDS;
        let lp_rho = truncated_normal_ln_pdf(rho, self.prior.mean, w * self.prior.sd, lo, hi);
        combine(lp_w + lp_rho, rho, data)
    }
}

/// A model bound to its observed data, usable as a sampler [`Target`].
pub struct Posterior<'a, M: ?Sized> {
    model: &'a M,
    data: &'a Sample,
}

impl<'a, M: PosteriorModel + ?Sized> Posterior<'a, M> {
    pub fn new(model: &'a M, data: &'a Sample) -> Self {
        Self { model, data }
    }

    pub fn model(&self) -> &'a M {
        self.model
    }
}

impl<M: PosteriorModel + ?Sized> Target for Posterior<'_, M> {
    fn unnorm_log_prob(&self, theta: &[f64]) -> f64 {
        self.model.log_density(theta, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplerConfig;
    use crate::error::Error;
    use crate::metropolis::MetropolisSampler;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn data() -> Sample {
        array![[0.8, 0.6], [-0.3, -0.1], [0.2, 0.5], [-0.7, -1.0]]
    }

    #[test]
    fn test_invalid_prior_is_rejected() {
        let bad = NormalPrior { mean: 0.0, sd: -1.0 };
        assert!(BoundedNormal::new(bad).is_err());
        assert!(WeightedNormal::new(bad).is_err());
    }

    #[test]
    fn test_uniform_is_pure_likelihood() {
        let d = data();
        for rho in [-0.9, -0.2, 0.0, 0.4, 0.95] {
            assert_abs_diff_eq!(
                Uniform.log_density(&[rho], &d),
                log_likelihood(rho, &d),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_bounded_normal_adds_truncated_prior() {
        let d = data();
        let model = BoundedNormal::new(NormalPrior { mean: 0.1, sd: 0.2 }).unwrap();
        let rho = 0.35;
        let expected =
            truncated_normal_ln_pdf(rho, 0.1, 0.2, -1.0, 1.0) + log_likelihood(rho, &d);
        assert_abs_diff_eq!(model.log_density(&[rho], &d), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_normal_scales_prior_width() {
        let d = data();
        let prior = NormalPrior { mean: 0.0, sd: 0.1 };
        let weighted = WeightedNormal::new(prior).unwrap();
        let wide = BoundedNormal::new(NormalPrior { mean: 0.0, sd: 0.3 }).unwrap();
        let rho = 0.5;
        assert_abs_diff_eq!(
            weighted.log_density(&[rho, 3.0], &d),
            wide.log_density(&[rho], &d) - (19.99_f64).ln(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_densities_are_undefined_outside_support() {
        let d = data();
        let prior = NormalPrior::default();
        let models: Vec<Box<dyn PosteriorModel>> = vec![
            Box::new(BoundedNormal::new(prior).unwrap()),
            Box::new(Uniform),
            Box::new(WeightedNormal::new(prior).unwrap()),
        ];
        for model in &models {
            let mut params = model.initial_params();
            assert!(model.log_density(&params, &d).is_finite());
            for rho in [1.0, -1.0, 1.3, f64::NAN] {
                params[0] = rho;
                assert_eq!(model.log_density(&params, &d), f64::NEG_INFINITY);
            }
        }
        let weighted = WeightedNormal::new(prior).unwrap();
        for w in [0.0, -1.0, 0.01, 20.0, 25.0] {
            assert_eq!(weighted.log_density(&[0.1, w], &d), f64::NEG_INFINITY);
        }
    }

    #[test]
    fn test_mismatched_shapes_have_no_density() {
        let d = data();
        let bounded = BoundedNormal::new(NormalPrior::default()).unwrap();
        let weighted = WeightedNormal::new(NormalPrior::default()).unwrap();
        assert_eq!(bounded.log_density(&[], &d), f64::NEG_INFINITY);
        assert_eq!(bounded.log_density(&[0.1, 1.0], &d), f64::NEG_INFINITY);
        assert_eq!(Uniform.log_density(&[0.1, 0.2], &d), f64::NEG_INFINITY);
        assert_eq!(weighted.log_density(&[0.1], &d), f64::NEG_INFINITY);

        let one_column = array![[0.1], [0.4], [-0.3]];
        assert_eq!(Uniform.log_density(&[0.1], &one_column), f64::NEG_INFINITY);
        assert_eq!(log_likelihood(0.1, &one_column), f64::NEG_INFINITY);
    }

    #[test]
    fn test_sampler_rejects_target_with_wrong_arity() {
        let d = data();
        let weighted = WeightedNormal::new(NormalPrior::default()).unwrap();
        let result = MetropolisSampler::new(
            Posterior::new(&weighted, &d),
            &["r"],
            &[0.0],
            SamplerConfig::default(),
        );
        assert!(matches!(result, Err(Error::InvalidParameters(_))));

        let one_column = array![[0.1], [0.4], [-0.3]];
        let result = MetropolisSampler::new(
            Posterior::new(&Uniform, &one_column),
            &["r"],
            &[0.0],
            SamplerConfig::default(),
        );
        assert!(matches!(result, Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn test_prior_mean_below_interval_keeps_support() {
        let d = data();
        let below = BoundedNormal::new(NormalPrior { mean: -2.0, sd: 0.1 }).unwrap();
        let above = BoundedNormal::new(NormalPrior { mean: 2.0, sd: 0.1 }).unwrap();
        assert!(below.log_density(&[0.0], &d).is_finite());
        assert!(below.log_density(&below.initial_params(), &d).is_finite());
        let mirrored: Sample = &d * &array![[1.0, -1.0]];
        for rho in [-0.5, 0.0, 0.5] {
            assert_abs_diff_eq!(
                below.log_density(&[rho], &d),
                above.log_density(&[-rho], &mirrored),
                epsilon = 1e-6
            );
        }

        let weighted = WeightedNormal::new(NormalPrior { mean: -2.0, sd: 0.1 }).unwrap();
        assert!(weighted.log_density(&[0.0, 0.5], &d).is_finite());
    }

    #[test]
    fn test_initial_params_start_inside_support() {
        let far = NormalPrior { mean: 3.0, sd: 1.0 };
        assert_eq!(BoundedNormal::new(far).unwrap().initial_params(), vec![0.99]);
        assert_eq!(
            WeightedNormal::new(NormalPrior::default()).unwrap().initial_params(),
            vec![0.0, 1.0]
        );
        assert_eq!(Uniform.initial_params(), vec![0.0]);
    }
}

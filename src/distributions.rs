/*!
Target and proposal distributions for the Metropolis sampler, plus the
density building blocks the posterior models are made of.

# Examples

```rust
use bayes_corr::distributions::{ScaledGaussian, Target};
use rand::{rngs::SmallRng, SeedableRng};

struct StdNormal;

impl Target for StdNormal {
    fn unnorm_log_prob(&self, theta: &[f64]) -> f64 {
        -0.5 * theta.iter().map(|x| x * x).sum::<f64>()
    }
}

let mut rng = SmallRng::seed_from_u64(1);
let proposal = ScaledGaussian::new(vec![0.5, 0.5]);
let candidate = proposal.sample(&[0.0, 0.0], &mut rng);
assert_eq!(candidate.len(), 2);
assert!(StdNormal.unnorm_log_prob(&candidate) <= 0.0);
```
*/

use nalgebra as na;
use ndarray::{ArrayView2, Axis};
use rand::Rng;
use rand_distr::StandardNormal;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use std::f64::consts::PI;

/// A distribution known up to a normalizing constant.
pub trait Target {
    /// Log of the unnormalized density at `theta`. `-inf` marks points
    /// outside the support.
    fn unnorm_log_prob(&self, theta: &[f64]) -> f64;
}

/// Symmetric random-walk proposal: every coordinate is perturbed by
/// independent Gaussian noise with its own step size.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledGaussian {
    pub scales: Vec<f64>,
}

impl ScaledGaussian {
    pub fn new(scales: Vec<f64>) -> Self {
        Self { scales }
    }

    /// Draws x' = x + scale * N(0, 1), coordinate-wise.
    pub fn sample<R: Rng + ?Sized>(&self, current: &[f64], rng: &mut R) -> Vec<f64> {
        current
            .iter()
            .zip(&self.scales)
            .map(|(x, s)| {
                let eps: f64 = rng.sample(StandardNormal);
                x + s * eps
            })
            .collect()
    }

    /// Multiplies every step size by `factor`, then clamps it to `[min, max]`.
    pub fn rescale(&mut self, factor: f64, min: f64, max: f64) {
        for s in self.scales.iter_mut() {
            *s = (*s * factor).clamp(min, max);
        }
    }
}

/// Log-density of a normal with `mean` and `sd`, truncated to the open
/// interval `(lo, hi)` and renormalized over it.
pub fn truncated_normal_ln_pdf(x: f64, mean: f64, sd: f64, lo: f64, hi: f64) -> f64 {
    if !(x > lo && x < hi) {
        return f64::NEG_INFINITY;
    }
    let Ok(normal) = Normal::new(mean, sd) else {
        return f64::NEG_INFINITY;
    };
    // take the difference in the tail nearer the interval
    let mass = if mean < lo {
        normal.sf(lo) - normal.sf(hi)
    } else {
        normal.cdf(hi) - normal.cdf(lo)
    };
    if !(mass > 0.0) {
        return f64::NEG_INFINITY;
    }
    normal.ln_pdf(x) - mass.ln()
}

/// Log-density of `Uniform(lo, hi)` over the open interval.
pub fn uniform_ln_pdf(x: f64, lo: f64, hi: f64) -> f64 {
    if x > lo && x < hi {
        -(hi - lo).ln()
    } else {
        f64::NEG_INFINITY
    }
}

/// Precision matrix of a zero-mean bivariate normal together with the log of
/// its determinant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precision {
    pub tau: na::Matrix2<f64>,
    pub ln_det: f64,
}

impl Precision {
    /// Inverts `S·C·S`, where `C = [[1, rho], [rho, 1]]` and `S = diag(sigma)`.
    ///
    /// Returns `None` when the covariance is not positive definite, which
    /// includes every `|rho| >= 1`.
    pub fn new(sigma: [f64; 2], rho: f64) -> Option<Self> {
        if !(rho.abs() < 1.0) {
            return None;
        }
        let c = na::Matrix2::new(1.0, rho, rho, 1.0);
        let s = na::Matrix2::from_diagonal(&na::Vector2::from(sigma));
        let chol = na::Cholesky::new(s * c * s)?;
        let ln_det_cov = 2.0 * chol.l().diagonal().iter().map(|d| d.ln()).sum::<f64>();
        let tau = chol.inverse();
        let ln_det = -ln_det_cov;
        ln_det.is_finite().then_some(Self { tau, ln_det })
    }

    /// Sum over rows of the bivariate normal log-density with mean zero.
    pub fn mvn_ln_pdf_rows(&self, data: ArrayView2<f64>) -> f64 {
        let n = data.nrows() as f64;
        let quad: f64 = data
            .axis_iter(Axis(0))
            .map(|row| {
                let x = na::Vector2::new(row[0], row[1]);
                (x.transpose() * self.tau * x)[(0, 0)]
            })
            .sum();
        -n * (2.0 * PI).ln() + 0.5 * n * self.ln_det - 0.5 * quad
    }
}

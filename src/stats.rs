//! Summary statistics for samples and traces.

use ndarray::prelude::*;
use ndarray_stats::{interpolate::Linear, CorrelationExt, Quantile1dExt};
use noisy_float::types::{n64, N64};

use crate::trace::Trace;

/// Sample Pearson correlation between the two columns of an n×2 sample.
///
/// Returns `None` when it is undefined (fewer than two rows or a constant
/// column).
pub fn pearson(sample: &Array2<f64>) -> Option<f64> {
    if sample.ncols() != 2 || sample.nrows() < 2 {
        return None;
    }
    let corr = sample.t().pearson_correlation().ok()?;
    let r = corr[[0, 1]];
    r.is_finite().then_some(r)
}

/// Posterior summary of a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSummary {
    pub name: String,
    pub mean: f64,
    pub sd: f64,
    /// Lower bound of the equal-tailed credible interval.
    pub lower: f64,
    /// Upper bound of the equal-tailed credible interval.
    pub upper: f64,
}

/// Mean, standard deviation and the central `prob` credible interval of
/// every parameter in `trace`. An empty trace yields no summaries, and a
/// column holding NaN is skipped.
pub fn summarize(trace: &Trace, prob: f64) -> Vec<ParamSummary> {
    if trace.is_empty() {
        return Vec::new();
    }
    let tail = (1.0 - prob.clamp(0.0, 1.0)) / 2.0;
    trace
        .names()
        .iter()
        .filter_map(|name| {
            let col = trace.column(name)?;
            let mean = col.mean()?;
            let sd = if col.len() > 1 { col.std(1.0) } else { 0.0 };
            let mut values = col
                .iter()
                .map(|&v| N64::try_new(v))
                .collect::<Option<Array1<N64>>>()?;
            let lower = values.quantile_mut(n64(tail), &Linear).ok()?;
            let upper = values.quantile_mut(n64(1.0 - tail), &Linear).ok()?;
            Some(ParamSummary {
                name: name.clone(),
                mean,
                sd,
                lower: lower.raw(),
                upper: upper.raw(),
            })
        })
        .collect()
}

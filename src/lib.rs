//! Bayesian estimation of a bivariate correlation coefficient from small
//! paired samples, using an adaptive random-walk Metropolis sampler under a
//! truncated normal, a uniform or a weighted normal prior.

pub mod config;
pub mod core;
pub mod dataset;
pub mod distributions;
pub mod error;
pub mod estimate;
pub mod io;
pub mod metropolis;
pub mod models;
pub mod stats;
pub mod trace;

pub use error::{Error, Result};

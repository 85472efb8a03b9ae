use indicatif::{ProgressBar, ProgressStyle};

use crate::trace::Trace;

pub trait MarkovChain<S> {
    /// Does one iteration of the chain. Returns `true` if the proposal was
    /// accepted and `false` if the current state was repeated.
    fn step(&mut self) -> bool;

    /// Get the current state without stepping.
    fn current_state(&self) -> &[S];
}

/// Runs `n_steps` iterations and records every resulting state, repeats
/// included, under the given parameter names.
pub fn run_chain<M>(chain: &mut M, names: &[&str], n_steps: usize, pb: Option<&ProgressBar>) -> Trace
where
    M: MarkovChain<f64>,
{
    let mut out = Trace::with_capacity(names.iter().copied(), n_steps);

    for _ in 0..n_steps {
        let accepted = chain.step();
        out.push(chain.current_state(), accepted);

        if let Some(pb) = pb {
            pb.inc(1);
        }
    }

    out
}

/// Runs `n_steps` iterations without recording them.
pub fn advance_chain<M>(chain: &mut M, n_steps: usize, pb: Option<&ProgressBar>)
where
    M: MarkovChain<f64>,
{
    for _ in 0..n_steps {
        chain.step();

        if let Some(pb) = pb {
            pb.inc(1);
        }
    }
}

/// A progress bar of length `len` in the crate's common style.
pub fn progress_bar(len: u64, prefix: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .map(|s| s.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_prefix(prefix.into());
    pb
}

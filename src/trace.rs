//! In-memory MCMC trace: one record per sampling iteration, one field per
//! named parameter.

use ndarray::{Array1, Array2};

/// Ordered, append-only sequence of chain states.
///
/// Rejected proposals show up as repeated records, so `len()` always equals
/// the number of sampling iterations that produced the trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    names: Vec<String>,
    draws: Vec<Vec<f64>>,
    n_accepted: usize,
}

/// A borrowed view of one trace record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    names: &'a [String],
    values: &'a [f64],
}

impl<'a> Record<'a> {
    /// Value of the parameter called `name`, if the trace has one.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    /// Iterates over `(name, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        let (names, values) = (self.names, self.values);
        names
            .iter()
            .zip(values.iter())
            .map(|(n, v)| (n.as_str(), *v))
    }
}

impl Trace {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::with_capacity(names, 0)
    }

    pub fn with_capacity<S: Into<String>>(names: impl IntoIterator<Item = S>, cap: usize) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            draws: Vec::with_capacity(cap),
            n_accepted: 0,
        }
    }

    /// Appends a state. `accepted` tells whether it came from an accepted
    /// proposal or repeats the previous state.
    pub(crate) fn push(&mut self, state: &[f64], accepted: bool) {
        debug_assert_eq!(state.len(), self.names.len());
        self.draws.push(state.to_vec());
        if accepted {
            self.n_accepted += 1;
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<Record<'_>> {
        self.draws.get(i).map(|values| Record {
            names: &self.names,
            values,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.draws.iter().map(move |values| Record {
            names: &self.names,
            values,
        })
    }

    /// All values of one parameter, in iteration order.
    pub fn column(&self, name: &str) -> Option<Array1<f64>> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(self.draws.iter().map(|d| d[idx]).collect())
    }

    /// The trace as a `len() × names().len()` matrix.
    pub fn to_array(&self) -> Array2<f64> {
        let n_params = self.names.len();
        let flat: Vec<f64> = self.draws.iter().flatten().copied().collect();
        Array2::from_shape_vec((self.draws.len(), n_params), flat)
            .unwrap_or_else(|_| Array2::zeros((0, n_params)))
    }

    /// Fraction of records that came from an accepted proposal.
    pub fn acceptance_rate(&self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        self.n_accepted as f64 / self.draws.len() as f64
    }
}

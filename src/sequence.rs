// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Sequence` type, a numeric parameter that is
//! either constant over the optimization horizon or given per time step.

use serde::{Deserialize, Serialize};

/// A numeric parameter that is either a scalar, broadcast to every time step,
/// or a time series with one value per time step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sequence {
    Scalar(f64),
    Series(Vec<f64>),
}

impl Sequence {
    /// Returns the value at the given time step.
    ///
    /// Scalars return their value for any step, series return `None` when the
    /// step is out of range.
    pub fn at(&self, step: usize) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::Series(values) => values.get(step).copied(),
        }
    }

    /// Returns the number of values in a series, or `None` for a scalar.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) => None,
            Self::Series(values) => Some(values.len()),
        }
    }

    /// Returns true if this is a series without any values.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Series(values) if values.is_empty())
    }

    /// Returns a new sequence with every value multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// Returns the largest value of the sequence, or `None` for an empty
    /// series.
    pub fn peak(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::Series(values) => values.iter().copied().reduce(f64::max),
        }
    }

    /// Splits the sequence into an absolute peak value and a shape relative to
    /// that peak.
    ///
    /// Scalars have no shape and return `None` as the second element.  Series
    /// are divided by their peak; an all-zero series keeps its zeros.
    pub fn split_peak(&self) -> (f64, Option<Sequence>) {
        match self {
            Self::Scalar(value) => (*value, None),
            Self::Series(_) => {
                let peak = self.peak().unwrap_or(0.0);
                if peak > 0.0 {
                    (peak, Some(self.map(|v| v / peak)))
                } else {
                    (peak, Some(self.map(|_| 0.0)))
                }
            }
        }
    }

    /// Returns true if every value is finite and not negative.
    pub fn is_non_negative(&self) -> bool {
        self.values().all(|v| v.is_finite() && v >= 0.0)
    }

    /// Returns true if every value is finite.
    pub fn is_finite(&self) -> bool {
        self.values().all(f64::is_finite)
    }

    /// Returns true if every value lies in the closed interval `[0, 1]`.
    pub fn is_fraction(&self) -> bool {
        self.values().all(|v| (0.0..=1.0).contains(&v))
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        let slice = match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Series(values) => values.as_slice(),
        };
        slice.iter().copied()
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            Self::Scalar(value) => Self::Scalar(f(*value)),
            Self::Series(values) => Self::Series(values.iter().map(|v| f(*v)).collect()),
        }
    }
}

impl From<f64> for Sequence {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for Sequence {
    fn from(values: Vec<f64>) -> Self {
        Self::Series(values)
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value}"),
            Self::Series(values) => write!(f, "{values:?}"),
        }
    }
}

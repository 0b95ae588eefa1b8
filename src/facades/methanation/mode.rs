// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The operating modes of a methanation reactor and the constraints each of
//! them puts on the reactor's product output flow.

use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;

use crate::{Error, Flow, Gradient, NonConvex, Sequence};

/// Minimum load of `VariableRateWithMin`, relative to the rate.
const MIN_LOAD: f64 = 0.5;

/// Minimum load of `VariableRateWithMinAndRamping`, relative to the rate.
const MIN_LOAD_RAMPING: f64 = 0.1;

/// Per-step ramp limits, relative to the rate.
const RAMP_UP: f64 = 0.01;
const RAMP_DOWN: f64 = 0.01;
const RAMP_DOWN_FAST: f64 = 0.05;

/// The operating mode of a methanation reactor.
///
/// Each mode determines the bounds and dynamics of the flow from the product
/// storage to the product bus.
// TODO: add a mode that limits the rate by the current educt storage level
// instead of a flat capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum MethanationMode {
    /// Bounded by the discharge capacity only.
    #[default]
    NoConstraints,
    /// Fixed to the rate in every time step.
    FixedRate,
    /// Between zero and the rate.
    VariableRate,
    /// Either off, or between 50% of the rate and the rate.
    VariableRateWithMin,
    /// Between 10% of the rate and the rate, changing by at most 1% of the
    /// rate per time step in either direction.
    VariableRateWithMinAndRamping,
    /// Between zero and the rate, increasing by at most 1% and decreasing by
    /// at most 5% of the rate per time step.
    VariableRateWithRamping,
}

impl MethanationMode {
    /// All selectable modes.
    pub const ALL: [MethanationMode; 6] = [
        Self::NoConstraints,
        Self::FixedRate,
        Self::VariableRate,
        Self::VariableRateWithMin,
        Self::VariableRateWithMinAndRamping,
        Self::VariableRateWithRamping,
    ];

    /// Returns the identifier of the mode, as used in scenario records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoConstraints => "no_constraints",
            Self::FixedRate => "fixed_rate",
            Self::VariableRate => "variable_rate",
            Self::VariableRateWithMin => "variable_rate_with_min",
            Self::VariableRateWithMinAndRamping => "variable_rate_with_min_and_ramping",
            Self::VariableRateWithRamping => "variable_rate_with_ramping",
        }
    }

    /// Returns true if the mode bounds the output flow by the methanation
    /// rate.
    pub fn requires_rate(&self) -> bool {
        !matches!(self, Self::NoConstraints)
    }

    /// Creates the product output flow for this mode.
    ///
    /// All bounds are relative to a nominal value equal to the (peak) rate, or
    /// to the (peak) discharge capacity for `NoConstraints`.  For time series
    /// rates, the per-step shape scales the upper bound, the fixed value and
    /// the minimum load.
    pub(crate) fn output_flow(
        &self,
        capacity_discharge: Option<&Sequence>,
        rate: Option<&Sequence>,
    ) -> Result<Flow, Error> {
        let rate = match (self.requires_rate(), rate) {
            (false, _) => {
                return Ok(capacity_discharge
                    .map(Flow::with_capacity)
                    .unwrap_or_default());
            }
            (true, Some(rate)) => rate,
            (true, None) => {
                return Err(Error::invalid_configuration(format!(
                    "methanation_rate is required for operating mode {self}."
                )));
            }
        };

        let mut flow = Flow::with_capacity(rate);
        match self {
            Self::NoConstraints | Self::VariableRate => {}
            Self::FixedRate => {
                flow.fix = Some(flow.max.take().unwrap_or(Sequence::Scalar(1.0)));
            }
            Self::VariableRateWithMin => {
                flow.min = Some(flow.relative_to_shape(MIN_LOAD));
                flow.nonconvex = Some(NonConvex);
            }
            Self::VariableRateWithMinAndRamping => {
                flow.min = Some(flow.relative_to_shape(MIN_LOAD_RAMPING));
                flow.positive_gradient = Some(ramp(RAMP_UP));
                flow.negative_gradient = Some(ramp(RAMP_DOWN));
            }
            Self::VariableRateWithRamping => {
                flow.positive_gradient = Some(ramp(RAMP_UP));
                flow.negative_gradient = Some(ramp(RAMP_DOWN_FAST));
            }
        }
        Ok(flow)
    }
}

fn ramp(ub: f64) -> Gradient {
    Gradient { ub, costs: 0.0 }
}

impl Display for MethanationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MethanationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::invalid_configuration(format!("unknown operating mode: {s}")))
    }
}

impl TryFrom<String> for MethanationMode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(mode: MethanationMode) -> Result<Flow, Error> {
        mode.output_flow(Some(&Sequence::from(7.7)), Some(&Sequence::from(2.0)))
    }

    #[test]
    fn test_parse() {
        for mode in MethanationMode::ALL {
            assert_eq!(mode.as_str().parse(), Ok(mode));
        }
        assert_eq!(
            "variable_rate_with_min_and_ramping".parse(),
            Ok(MethanationMode::VariableRateWithMinAndRamping)
        );
        assert_eq!(
            "Fixed_Rate".parse::<MethanationMode>(),
            Err(Error::invalid_configuration(
                "unknown operating mode: Fixed_Rate"
            ))
        );
        assert_eq!(MethanationMode::default(), MethanationMode::NoConstraints);
    }

    #[test]
    fn test_deserialize() -> Result<(), serde_json::Error> {
        let mode: MethanationMode = serde_json::from_str("\"fixed_rate\"")?;
        assert_eq!(mode, MethanationMode::FixedRate);

        assert!(serde_json::from_str::<MethanationMode>("\"educt_limited\"")
            .is_err_and(|e| e
                .to_string()
                .contains("unknown operating mode: educt_limited")));
        Ok(())
    }

    #[test]
    fn test_no_constraints() -> Result<(), Error> {
        assert_eq!(
            flow(MethanationMode::NoConstraints)?,
            Flow {
                nominal_value: Some(7.7),
                ..Flow::default()
            }
        );
        assert_eq!(
            MethanationMode::NoConstraints.output_flow(None, None)?,
            Flow::new()
        );
        Ok(())
    }

    #[test]
    fn test_fixed_rate() -> Result<(), Error> {
        assert_eq!(
            flow(MethanationMode::FixedRate)?,
            Flow {
                nominal_value: Some(2.0),
                fix: Some(Sequence::from(1.0)),
                ..Flow::default()
            }
        );
        Ok(())
    }

    #[test]
    fn test_variable_rate() -> Result<(), Error> {
        assert_eq!(
            flow(MethanationMode::VariableRate)?,
            Flow {
                nominal_value: Some(2.0),
                ..Flow::default()
            }
        );
        Ok(())
    }

    #[test]
    fn test_variable_rate_with_min() -> Result<(), Error> {
        assert_eq!(
            flow(MethanationMode::VariableRateWithMin)?,
            Flow {
                nominal_value: Some(2.0),
                min: Some(Sequence::from(0.5)),
                nonconvex: Some(NonConvex),
                ..Flow::default()
            }
        );
        Ok(())
    }

    #[test]
    fn test_variable_rate_with_min_and_ramping() -> Result<(), Error> {
        assert_eq!(
            flow(MethanationMode::VariableRateWithMinAndRamping)?,
            Flow {
                nominal_value: Some(2.0),
                min: Some(Sequence::from(0.1)),
                positive_gradient: Some(Gradient {
                    ub: 0.01,
                    costs: 0.0
                }),
                negative_gradient: Some(Gradient {
                    ub: 0.01,
                    costs: 0.0
                }),
                ..Flow::default()
            }
        );
        Ok(())
    }

    #[test]
    fn test_variable_rate_with_ramping() -> Result<(), Error> {
        assert_eq!(
            flow(MethanationMode::VariableRateWithRamping)?,
            Flow {
                nominal_value: Some(2.0),
                positive_gradient: Some(Gradient {
                    ub: 0.01,
                    costs: 0.0
                }),
                negative_gradient: Some(Gradient {
                    ub: 0.05,
                    costs: 0.0
                }),
                ..Flow::default()
            }
        );
        Ok(())
    }

    #[test]
    fn test_rate_series() -> Result<(), Error> {
        let rate = Sequence::from(vec![1.0, 2.0, 0.5]);

        let fixed = MethanationMode::FixedRate.output_flow(None, Some(&rate))?;
        assert_eq!(fixed.nominal_value, Some(2.0));
        assert_eq!(fixed.max, None);
        assert_eq!(
            (0..3).map(|t| fixed.fixed_value_at(t)).collect::<Vec<_>>(),
            vec![Some(1.0), Some(2.0), Some(0.5)]
        );

        let with_min = MethanationMode::VariableRateWithMin.output_flow(None, Some(&rate))?;
        assert_eq!(
            (0..3).map(|t| with_min.min_value_at(t)).collect::<Vec<_>>(),
            vec![Some(0.5), Some(1.0), Some(0.25)]
        );
        assert_eq!(with_min.max_value_at(2), Some(0.5));

        Ok(())
    }

    #[test]
    fn test_missing_rate() {
        for mode in MethanationMode::ALL.into_iter().filter(|m| m.requires_rate()) {
            assert_eq!(
                mode.output_flow(Some(&Sequence::from(7.7)), None),
                Err(Error::invalid_configuration(format!(
                    "methanation_rate is required for operating mode {mode}."
                )))
            );
        }
    }
}

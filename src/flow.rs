// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Flow` struct, which holds the parameters of a
//! directed flow between two nodes of an energy system.

use std::collections::BTreeMap;

use crate::{Error, Sequence};

/// Parameter names that describe a flow's bounds and dynamics.  They can only
/// be set through the typed fields of [`Flow`], never as custom attributes.
pub(crate) const RESERVED_ATTRIBUTES: [&str; 9] = [
    "nominal_value",
    "fix",
    "min",
    "max",
    "variable_costs",
    "positive_gradient",
    "negative_gradient",
    "nonconvex",
    "investment",
];

/// A limit on the change of a flow between two consecutive time steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient {
    /// Upper bound on the change per time step, relative to the nominal value.
    pub ub: f64,
    /// Costs per unit of change.
    pub costs: f64,
}

/// Marks a flow as non-convex: in every time step the flow is either zero or
/// between its minimum and maximum, which requires a binary on/off status in
/// the optimization problem.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NonConvex;

/// The parameters of a directed flow.
///
/// `fix`, `min` and `max` are relative to `nominal_value`, as are the
/// gradient bounds.  A flow without a nominal value is unbounded and its
/// relative bounds have no effect.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flow {
    pub nominal_value: Option<f64>,
    pub fix: Option<Sequence>,
    pub min: Option<Sequence>,
    pub max: Option<Sequence>,
    pub variable_costs: Option<Sequence>,
    pub positive_gradient: Option<Gradient>,
    pub negative_gradient: Option<Gradient>,
    pub nonconvex: Option<NonConvex>,
    pub custom_attributes: BTreeMap<String, f64>,
}

impl Flow {
    /// Creates an unconstrained flow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a flow bounded by the given capacity.
    ///
    /// A time series capacity becomes a nominal value equal to its peak plus a
    /// relative `max` profile.
    pub fn with_capacity(capacity: &Sequence) -> Self {
        let (peak, shape) = capacity.split_peak();
        Self {
            nominal_value: Some(peak),
            max: shape,
            ..Self::default()
        }
    }

    /// Sets the variable costs of the flow.
    pub fn with_variable_costs(mut self, costs: impl Into<Sequence>) -> Self {
        self.variable_costs = Some(costs.into());
        self
    }

    /// Returns `fraction` scaled by the flow's profile: `max`, or `fix` for
    /// fixed flows.  Flows without a profile get a scalar.
    pub(crate) fn relative_to_shape(&self, fraction: f64) -> Sequence {
        match self.max.as_ref().or(self.fix.as_ref()) {
            Some(shape) => shape.scaled(fraction),
            None => Sequence::Scalar(fraction),
        }
    }

    /// Makes the flow non-convex with the given minimum load, relative to
    /// the flow's upper bound in every time step.
    ///
    /// Returns the minimum that was replaced, if any.
    pub fn set_nonconvex_min(&mut self, min: f64) -> Option<Sequence> {
        let replaced = self.min.replace(self.relative_to_shape(min));
        self.nonconvex = Some(NonConvex);
        replaced
    }

    /// Adds custom attributes to the flow.
    ///
    /// Fails if an attribute would shadow one of the flow's bound or dynamic
    /// parameters.
    pub fn extend_custom_attributes(
        &mut self,
        attributes: &BTreeMap<String, f64>,
    ) -> Result<(), Error> {
        if let Some(key) = attributes
            .keys()
            .find(|k| RESERVED_ATTRIBUTES.contains(&k.as_str()))
        {
            return Err(Error::invalid_configuration(format!(
                "Flow parameter '{key}' can't be set as a custom attribute."
            )));
        }
        if let Some((key, value)) = attributes.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::invalid_configuration(format!(
                "Flow parameter '{key}' must be finite, got {value}."
            )));
        }
        self.custom_attributes
            .extend(attributes.iter().map(|(k, v)| (k.clone(), *v)));
        Ok(())
    }

    /// Returns the absolute fixed value of the flow at the given time step.
    pub fn fixed_value_at(&self, step: usize) -> Option<f64> {
        self.absolute(self.fix.as_ref(), step)
    }

    /// Returns the absolute lower bound of the flow at the given time step,
    /// while operating.
    pub fn min_value_at(&self, step: usize) -> Option<f64> {
        self.absolute(self.min.as_ref(), step)
    }

    /// Returns the absolute upper bound of the flow at the given time step.
    pub fn max_value_at(&self, step: usize) -> Option<f64> {
        let nominal = self.nominal_value?;
        match &self.max {
            Some(max) => max.at(step).map(|v| v * nominal),
            None => Some(nominal),
        }
    }

    /// Returns the absolute limit on the increase between two time steps.
    pub fn max_increase(&self) -> Option<f64> {
        Some(self.positive_gradient?.ub * self.nominal_value?)
    }

    /// Returns the absolute limit on the decrease between two time steps.
    pub fn max_decrease(&self) -> Option<f64> {
        Some(self.negative_gradient?.ub * self.nominal_value?)
    }

    /// Returns the time series attached to the flow.
    pub(crate) fn sequences(&self) -> impl Iterator<Item = (&'static str, &Sequence)> {
        [
            ("fix", self.fix.as_ref()),
            ("min", self.min.as_ref()),
            ("max", self.max.as_ref()),
            ("variable_costs", self.variable_costs.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, seq)| seq.map(|s| (name, s)))
    }

    fn absolute(&self, relative: Option<&Sequence>, step: usize) -> Option<f64> {
        Some(relative?.at(step)? * self.nominal_value?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_capacity() {
        let flow = Flow::with_capacity(&Sequence::from(7.7));
        assert_eq!(flow.nominal_value, Some(7.7));
        assert_eq!(flow.max, None);
        assert_eq!(flow.max_value_at(10), Some(7.7));

        let flow = Flow::with_capacity(&Sequence::from(vec![2.0, 4.0]));
        assert_eq!(flow.nominal_value, Some(4.0));
        assert_eq!(flow.max_value_at(0), Some(2.0));
        assert_eq!(flow.max_value_at(1), Some(4.0));
        assert_eq!(flow.max_value_at(2), None);
    }

    #[test]
    fn test_nonconvex_min() {
        let mut flow = Flow::with_capacity(&Sequence::from(2.0));
        assert_eq!(flow.set_nonconvex_min(0.5), None);
        assert_eq!(flow.min_value_at(0), Some(1.0));

        assert_eq!(flow.set_nonconvex_min(0.2), Some(Sequence::from(0.5)));
        assert_eq!(flow.min, Some(Sequence::from(0.2)));
        assert_eq!(flow.nonconvex, Some(NonConvex));

        // A convex minimum is replaced and reported as well.
        let mut flow = Flow::with_capacity(&Sequence::from(2.0));
        flow.min = Some(Sequence::from(0.1));
        assert_eq!(flow.set_nonconvex_min(0.2), Some(Sequence::from(0.1)));
        assert_eq!(flow.min_value_at(0), Some(0.4));
    }

    #[test]
    fn test_nonconvex_min_follows_profile() {
        let mut flow = Flow::with_capacity(&Sequence::from(vec![0.1, 1.0]));
        assert_eq!(flow.set_nonconvex_min(0.2), None);
        assert_eq!(flow.min, Some(Sequence::from(vec![0.1 * 0.2, 0.2])));
        for step in 0..2 {
            assert!(flow.min_value_at(step) <= flow.max_value_at(step));
        }
        assert_eq!(flow.min_value_at(1), Some(0.2));
    }

    #[test]
    fn test_custom_attributes() {
        let mut flow = Flow::new();
        let attributes = BTreeMap::from([("emission_factor".to_string(), 0.2)]);
        assert!(flow.extend_custom_attributes(&attributes).is_ok());
        assert_eq!(flow.custom_attributes["emission_factor"], 0.2);
        assert_eq!(flow.nominal_value, None);

        let attributes = BTreeMap::from([("min".to_string(), 0.2)]);
        assert!(flow.extend_custom_attributes(&attributes).is_err_and(|e| e
            == Error::invalid_configuration(
                "Flow parameter 'min' can't be set as a custom attribute."
            )));

        let attributes = BTreeMap::from([("full_load_time".to_string(), f64::NAN)]);
        assert!(flow.extend_custom_attributes(&attributes).is_err());
        assert_eq!(flow.custom_attributes.len(), 1);
    }

    #[test]
    fn test_gradient_limits() {
        let flow = Flow {
            nominal_value: Some(2.0),
            positive_gradient: Some(Gradient { ub: 0.01, costs: 0.0 }),
            ..Flow::default()
        };
        assert_eq!(flow.max_increase(), Some(0.02));
        assert_eq!(flow.max_decrease(), None);
        assert_eq!(Flow::new().max_increase(), None);
    }
}

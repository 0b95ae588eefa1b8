// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The declarative parameters of a methanation reactor.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{Error, Sequence};

use super::MethanationMode;

/// Parameters of a [`MethanationReactor`][super::MethanationReactor].
///
/// Bus, carrier and tech references are optional here so that incomplete
/// scenario records can be represented; they are required when the reactor is
/// built.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MethanationReactorParams {
    pub label: String,
    pub carrier: Option<String>,
    pub tech: Option<String>,

    /// Hydrogen educt bus.  The reactor's input flow leaves this bus.
    pub h2_bus: Option<String>,
    /// Carbon dioxide educt bus.
    pub co2_bus: Option<String>,
    /// Methane product bus.  The reactor's output flow enters this bus.
    pub ch4_bus: Option<String>,

    /// Maximum flow into the educt storage.  Unbounded when `None`.
    pub capacity_charge: Option<Sequence>,
    /// Maximum flow out of the product storage in `NoConstraints` mode.
    /// Unbounded when `None`.
    pub capacity_discharge: Option<Sequence>,
    pub storage_capacity_educts: Option<Sequence>,
    pub storage_capacity_products: Option<Sequence>,

    pub efficiency_charge: Sequence,
    pub efficiency_discharge: Sequence,
    pub efficiency_methanation: Sequence,

    /// Methane output rate, required by every mode except `NoConstraints`.
    pub methanation_rate: Option<Sequence>,
    pub methanation_option: MethanationMode,

    /// Relative loss of the educt storage per time step.
    pub loss_rate_educts: Sequence,
    pub initial_storage_level_educts: Option<f64>,
    pub initial_storage_level_products: Option<f64>,

    /// Makes the charge and output flows non-convex with a minimum load of
    /// [`MIN_FLOW`][super::MIN_FLOW].
    pub nonconvex: bool,
    /// Variable costs of the output flow.
    pub marginal_cost: Sequence,

    /// Custom attributes of the input flow.
    pub input_parameters: BTreeMap<String, f64>,
    /// Custom attributes of the output flow.
    pub output_parameters: BTreeMap<String, f64>,

    /// Capacity expansion is not supported; must be `false`.
    pub expandable: bool,
}

impl Default for MethanationReactorParams {
    fn default() -> Self {
        Self {
            label: String::new(),
            carrier: None,
            tech: None,
            h2_bus: None,
            co2_bus: None,
            ch4_bus: None,
            capacity_charge: None,
            capacity_discharge: None,
            storage_capacity_educts: None,
            storage_capacity_products: None,
            efficiency_charge: Sequence::Scalar(1.0),
            efficiency_discharge: Sequence::Scalar(1.0),
            efficiency_methanation: Sequence::Scalar(1.0),
            methanation_rate: None,
            methanation_option: MethanationMode::default(),
            loss_rate_educts: Sequence::Scalar(0.0),
            initial_storage_level_educts: None,
            initial_storage_level_products: None,
            nonconvex: false,
            marginal_cost: Sequence::Scalar(0.0),
            input_parameters: BTreeMap::new(),
            output_parameters: BTreeMap::new(),
            expandable: false,
        }
    }
}

/// The mandatory references of validated parameters.
pub(crate) struct References<'a> {
    pub(crate) carrier: &'a str,
    pub(crate) tech: &'a str,
    pub(crate) h2_bus: &'a str,
    pub(crate) co2_bus: &'a str,
    pub(crate) ch4_bus: &'a str,
    pub(crate) storage_capacity_educts: &'a Sequence,
    pub(crate) storage_capacity_products: &'a Sequence,
}

impl MethanationReactorParams {
    /// Checks the parameters and returns the mandatory references.
    pub(crate) fn validate(&self) -> Result<References<'_>, Error> {
        if self.expandable {
            return Err(Error::unsupported_feature(
                "capacity expansion not implemented for this component",
            ));
        }
        if self.label.is_empty() {
            return Err(missing("label"));
        }

        let refs = References {
            carrier: required(&self.carrier, "carrier")?,
            tech: required(&self.tech, "tech")?,
            h2_bus: required(&self.h2_bus, "h2_bus")?,
            co2_bus: required(&self.co2_bus, "co2_bus")?,
            ch4_bus: required(&self.ch4_bus, "ch4_bus")?,
            storage_capacity_educts: self
                .storage_capacity_educts
                .as_ref()
                .ok_or_else(|| missing("storage_capacity_educts"))?,
            storage_capacity_products: self
                .storage_capacity_products
                .as_ref()
                .ok_or_else(|| missing("storage_capacity_products"))?,
        };
        if refs.h2_bus == refs.co2_bus {
            return Err(Error::invalid_configuration(format!(
                "h2_bus and co2_bus must be different buses, got {} for both.",
                refs.h2_bus
            )));
        }

        let non_negative = [
            ("capacity_charge", self.capacity_charge.as_ref()),
            ("capacity_discharge", self.capacity_discharge.as_ref()),
            ("storage_capacity_educts", Some(refs.storage_capacity_educts)),
            ("storage_capacity_products", Some(refs.storage_capacity_products)),
            ("efficiency_charge", Some(&self.efficiency_charge)),
            ("efficiency_discharge", Some(&self.efficiency_discharge)),
            ("efficiency_methanation", Some(&self.efficiency_methanation)),
            ("methanation_rate", self.methanation_rate.as_ref()),
            ("loss_rate_educts", Some(&self.loss_rate_educts)),
        ];
        for (name, value) in non_negative {
            let Some(value) = value else {
                continue;
            };
            if value.is_empty() {
                return Err(Error::invalid_configuration(format!(
                    "{name} must not be an empty time series."
                )));
            }
            if !value.is_non_negative() {
                return Err(Error::invalid_configuration(format!(
                    "{name} must be non-negative, got {value}."
                )));
            }
        }
        if !self.marginal_cost.is_finite() {
            return Err(Error::invalid_configuration(format!(
                "marginal_cost must be finite, got {}.",
                self.marginal_cost
            )));
        }
        for (name, level) in [
            ("initial_storage_level_educts", self.initial_storage_level_educts),
            ("initial_storage_level_products", self.initial_storage_level_products),
        ] {
            if let Some(level) = level.filter(|l| !Sequence::Scalar(*l).is_fraction()) {
                return Err(Error::invalid_configuration(format!(
                    "{name} must be between 0 and 1, got {level}."
                )));
            }
        }

        Ok(refs)
    }
}

fn missing(name: &str) -> Error {
    Error::invalid_configuration(format!("missing required parameter: {name}"))
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, Error> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(name))
}

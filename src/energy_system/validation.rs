// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating an [`EnergySystem`] before it is handed to an
//! optimization backend.

use crate::node::KindPredicates;
use crate::{EnergySystem, Error, Node, Sequence};

impl EnergySystem {
    /// Validates the energy system.
    ///
    /// Checks that:
    /// - time series have one value per time step of the horizon, if the
    ///   horizon length is configured,
    /// - conversion factors refer to neighbours of their converter,
    /// - storages have at least one flow,
    /// - buses have at least one flow, unless unconnected buses are allowed.
    pub fn validate(&self) -> Result<(), Error> {
        for node in self.nodes() {
            self.validate_node(node)?;
        }
        for (source, target, flow) in self.flows() {
            for (name, sequence) in flow.sequences() {
                self.validate_length(sequence, || {
                    format!("Flow ({}, {}) `{name}`", source.label(), target.label())
                })?;
            }
        }
        Ok(())
    }

    fn validate_node(&self, node: &Node) -> Result<(), Error> {
        let label = node.label();
        let connected =
            self.inputs(label)?.next().is_some() || self.outputs(label)?.next().is_some();

        if node.is_bus() && !connected && !self.config.allow_unconnected_buses {
            return Err(Error::invalid_energy_system(format!(
                "{node} has no flows attached."
            )));
        }

        if let Some(storage) = node.as_storage() {
            if !connected {
                return Err(Error::invalid_energy_system(format!(
                    "{node} has no flows attached."
                )));
            }
            for (name, sequence) in storage.sequences() {
                self.validate_length(sequence, || format!("{node} `{name}`"))?;
            }
        }

        if let Some(converter) = node.as_converter() {
            for (neighbour, factor) in &converter.conversion_factors {
                let is_neighbour = self
                    .inputs(label)?
                    .chain(self.outputs(label)?)
                    .any(|n| n.label() == neighbour);
                if !is_neighbour {
                    return Err(Error::invalid_energy_system(format!(
                        "{node} has a conversion factor for {neighbour}, which is not connected to it."
                    )));
                }
                self.validate_length(factor, || {
                    format!("{node} conversion factor for {neighbour}")
                })?;
            }
        }

        Ok(())
    }

    fn validate_length(
        &self,
        sequence: &Sequence,
        context: impl FnOnce() -> String,
    ) -> Result<(), Error> {
        match (self.config.timesteps, sequence.len()) {
            (Some(expected), Some(len)) if expected != len => {
                Err(Error::invalid_energy_system(format!(
                    "{} has {len} values, expected {expected}.",
                    context()
                )))
            }
            _ => Ok(()),
        }
    }
}

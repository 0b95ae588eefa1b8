// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains features
//! that are shared by all tests of the crate.
//!
//! - the `EnergySystemBuilder`, which declaratively builds an energy system
//!   with hydrogen, carbon dioxide and methane buses for use in tests.
//! - `reactor_params`, a complete set of methanation reactor parameters
//!   attached to those buses.

use crate::{
    EnergySystem, EnergySystemConfig, Error, Flow, MethanationMode, MethanationReactorParams,
    Node,
};

/// A builder for energy systems used in tests.
///
/// The energy system always contains a balanced `h2` bus, an unbalanced `co2`
/// bus and a balanced `ch4` bus.
pub(crate) struct EnergySystemBuilder {
    config: EnergySystemConfig,
    with_sinks: bool,
}

impl EnergySystemBuilder {
    /// Creates a new `EnergySystemBuilder`.
    pub(crate) fn new() -> Self {
        EnergySystemBuilder {
            config: EnergySystemConfig::default(),
            with_sinks: false,
        }
    }

    /// Replaces the configuration of the energy system.
    pub(crate) fn config(mut self, config: EnergySystemConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the number of time steps of the optimization horizon.
    pub(crate) fn timesteps(mut self, timesteps: usize) -> Self {
        self.config.timesteps = Some(timesteps);
        self
    }

    /// Attaches an excess sink to every bus.
    pub(crate) fn with_sinks(mut self) -> Self {
        self.with_sinks = true;
        self
    }

    /// Builds and returns the energy system.
    pub(crate) fn build(self) -> Result<EnergySystem, Error> {
        let mut es = EnergySystem::new(self.config);
        es.add_bus("h2", true)?;
        es.add_bus("co2", false)?;
        es.add_bus("ch4", true)?;

        if self.with_sinks {
            for bus in ["h2", "co2", "ch4"] {
                let sink = format!("{bus}-excess");
                es.add_node(Node::sink(&sink))?;
                es.connect(bus, sink, Flow::new())?;
            }
        }

        Ok(es)
    }
}

/// Returns reactor parameters with the capacities of the methanation example
/// scenario, attached to the buses created by `EnergySystemBuilder`.
pub(crate) fn reactor_params(mode: MethanationMode) -> MethanationReactorParams {
    MethanationReactorParams {
        label: "m_reactor".to_string(),
        carrier: Some("h2_co2".to_string()),
        tech: Some("methanation_reactor".to_string()),
        h2_bus: Some("h2".to_string()),
        co2_bus: Some("co2".to_string()),
        ch4_bus: Some("ch4".to_string()),
        capacity_charge: Some(2.8.into()),
        capacity_discharge: Some(7.7.into()),
        storage_capacity_educts: Some(24000.0.into()),
        storage_capacity_products: Some(110000.0.into()),
        efficiency_charge: 1.0.into(),
        efficiency_discharge: 1.0.into(),
        methanation_rate: Some(2.0.into()),
        efficiency_methanation: 0.93.into(),
        methanation_option: mode,
        ..MethanationReactorParams::default()
    }
}

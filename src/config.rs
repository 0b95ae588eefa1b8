// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the `EnergySystem`.

/// Configuration options for the `EnergySystem`.
#[derive(Clone, Default, Debug)]
pub struct EnergySystemConfig {
    /// The number of time steps in the optimization horizon.
    ///
    /// When set, every time series attached to a flow, converter or storage
    /// must have exactly this many values.  Scalars are broadcast to every
    /// time step and are always accepted.
    pub timesteps: Option<usize>,

    /// Whether to allow buses that have no flows attached to them.
    pub allow_unconnected_buses: bool,
}

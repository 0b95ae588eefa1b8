// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Energy System Facades

This is a library for assembling the network of an energy system optimization
model: buses, converters and storages connected by flows, and facades that
expand a single high-level component into several of those primitive nodes.

## The `EnergySystem`

The main struct is [`EnergySystem`].  Buses and other nodes are added with
[`add_bus`][EnergySystem::add_bus] and [`add_node`][EnergySystem::add_node],
and connected with [`connect`][EnergySystem::connect].

Every addition is checked before the energy system is modified, so a failed
addition leaves it unchanged.

## Facades

Composite components implement the [`Facade`] trait.  A facade is fully
assembled in a [`Subgraph`] before it is handed to
[`add_facade`][EnergySystem::add_facade], which attaches all of its nodes and
flows at once.

The [`MethanationReactor`] is a facade that converts hydrogen and carbon
dioxide into methane through an educt storage, a reaction and a product
storage.  Its [`MethanationMode`] decides how the product storage may feed
the methane bus.

Facades can also be created from scenario records through a
[`FacadeRegistry`], which maps type names to factories.

## Validation

The [`validate`][EnergySystem::validate] method checks the assembled energy
system before it is handed to an optimization backend, including checking
that:

- Time series match the length of the optimization horizon.
- Conversion factors refer to neighbours of their converter.
- Buses and storages have flows attached.

If any of the checks fail, the method returns an [`Error`].
*/

mod config;
pub use config::EnergySystemConfig;

mod error;
pub use error::{Error, ErrorKind};

mod sequence;
pub use sequence::Sequence;

mod flow;
pub use flow::{Flow, Gradient, NonConvex};

mod node;
pub use node::{Bus, Component, Converter, Node, NodeKind, Storage};

mod subgraph;
pub use subgraph::{Connection, Subgraph};

mod energy_system;
pub use energy_system::{iterators, EnergySystem};

mod facades;
pub use facades::{
    Facade, FacadeFactory, FacadeRegistry, MethanationMode, MethanationReactor,
    MethanationReactorParams, MIN_FLOW, MIX_RATIO_CO2, MIX_RATIO_H2,
};

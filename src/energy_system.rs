// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A network of buses, converters and storages connected by flows, ready to
//! be handed to an optimization backend.

mod creation;
mod retrieval;
mod validation;

pub mod iterators;

#[cfg(test)]
pub(crate) mod test_utils;

use crate::{EnergySystemConfig, Facade, Flow, Node};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// `Node`s stored in a `DiGraph` instance can be addressed with `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any node label, so
/// that nodes in the `DiGraph` can be retrieved from their labels.
pub(crate) type NodeIndexMap = HashMap<String, NodeIndex>;

/// `Flow`s are not stored in the `DiGraph` instance, so we need to store them
/// separately.
///
/// `FlowMap` can be used to lookup the `Flow` for any pair of source and
/// target `NodeIndex` values.
pub(crate) type FlowMap = HashMap<(NodeIndex, NodeIndex), Flow>;

/// An energy system: the nodes of an optimization network, the flows between
/// them and the facades that were expanded into them.
pub struct EnergySystem {
    graph: DiGraph<Node, ()>,
    node_indices: NodeIndexMap,
    flows: FlowMap,
    facades: Vec<Box<dyn Facade>>,
    config: EnergySystemConfig,
}

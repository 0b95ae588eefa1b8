// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving nodes, flows and facades from an [`EnergySystem`].

use petgraph::graph::NodeIndex;

use crate::iterators::{Flows, Neighbors, Nodes};
use crate::{EnergySystem, Error, Facade, Flow, Node};

/// `Node`, `Flow` and `Facade` retrieval.
impl EnergySystem {
    /// Returns the node with the given label, if it exists.
    pub fn node(&self, label: &str) -> Result<&Node, Error> {
        self.index(label).map(|i| &self.graph[i])
    }

    /// Returns an iterator over the nodes in the energy system, in insertion
    /// order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            iter: self.graph.raw_nodes().iter(),
        }
    }

    /// Returns the flow from `source` to `target`.
    pub fn flow(&self, source: &str, target: &str) -> Result<&Flow, Error> {
        let key = (self.index(source)?, self.index(target)?);
        self.flows.get(&key).ok_or_else(|| {
            Error::node_not_found(format!("No flow from {source} to {target}."))
        })
    }

    /// Returns an iterator over the flows in the energy system, in insertion
    /// order.
    pub fn flows(&self) -> Flows<'_> {
        Flows {
            es: self,
            iter: self.graph.raw_edges().iter(),
        }
    }

    /// Returns an iterator over the nodes with a flow *into* the node with
    /// the given label.
    ///
    /// Returns an error if the given label does not exist.
    pub fn inputs(&self, label: &str) -> Result<Neighbors<'_>, Error> {
        self.index(label).map(|index| Neighbors {
            graph: &self.graph,
            iter: self
                .graph
                .neighbors_directed(index, petgraph::Direction::Incoming),
        })
    }

    /// Returns an iterator over the nodes with a flow *from* the node with
    /// the given label.
    ///
    /// Returns an error if the given label does not exist.
    pub fn outputs(&self, label: &str) -> Result<Neighbors<'_>, Error> {
        self.index(label).map(|index| Neighbors {
            graph: &self.graph,
            iter: self
                .graph
                .neighbors_directed(index, petgraph::Direction::Outgoing),
        })
    }

    /// Returns the facade with the given label.
    pub fn facade(&self, label: &str) -> Result<&dyn Facade, Error> {
        self.facades
            .iter()
            .find(|f| f.label() == label)
            .map(|f| &**f)
            .ok_or_else(|| Error::node_not_found(format!("Facade with label {label} not found.")))
    }

    /// Returns an iterator over the facades in the energy system.
    pub fn facades(&self) -> impl Iterator<Item = &dyn Facade> {
        self.facades.iter().map(|f| &**f)
    }

    /// Returns the number of time steps in the optimization horizon, if
    /// configured.
    pub fn timesteps(&self) -> Option<usize> {
        self.config.timesteps
    }

    fn index(&self, label: &str) -> Result<NodeIndex, Error> {
        self.node_indices
            .get(label)
            .copied()
            .ok_or_else(|| Error::node_not_found(format!("Node with label {label} not found.")))
    }
}

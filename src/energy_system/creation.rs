// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for adding nodes, flows and facades to an [`EnergySystem`].

use std::collections::HashSet;

use petgraph::graph::DiGraph;

use crate::{EnergySystemConfig, Error, Facade, Flow, Node, Subgraph};

use super::{EnergySystem, FlowMap, NodeIndexMap};

/// `EnergySystem` instantiation and assembly.
impl EnergySystem {
    /// Creates a new, empty [`EnergySystem`].
    pub fn new(config: EnergySystemConfig) -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: NodeIndexMap::new(),
            flows: FlowMap::new(),
            facades: Vec::new(),
            config,
        }
    }

    /// Adds a bus with the given label.
    pub fn add_bus(&mut self, label: impl Into<String>, balanced: bool) -> Result<(), Error> {
        self.add_node(Node::bus(label, balanced))
    }

    /// Adds a node.
    ///
    /// Returns an error if a node with the same label exists already.
    pub fn add_node(&mut self, node: Node) -> Result<(), Error> {
        let mut subgraph = Subgraph::new();
        subgraph.add_node(node);
        self.commit(subgraph)
    }

    /// Adds a flow between two existing nodes.
    pub fn connect(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        flow: Flow,
    ) -> Result<(), Error> {
        let mut subgraph = Subgraph::new();
        subgraph.connect(source, target, flow);
        self.commit(subgraph)
    }

    /// Adds a facade, attaching all of its nodes and flows.
    ///
    /// Either the whole subgraph of the facade is attached, or, if any part
    /// of it is invalid, nothing is.
    pub fn add_facade<F: Facade + 'static>(&mut self, facade: F) -> Result<(), Error> {
        self.add_boxed_facade(Box::new(facade))
    }

    /// Adds a boxed facade, e.g. one created through a
    /// [`FacadeRegistry`][crate::FacadeRegistry].
    pub fn add_boxed_facade(&mut self, facade: Box<dyn Facade>) -> Result<(), Error> {
        if self.facades.iter().any(|f| f.label() == facade.label()) {
            return Err(Error::invalid_energy_system(format!(
                "Duplicate facade label found: {}",
                facade.label()
            )));
        }
        self.commit(facade.subgraph().clone())?;
        tracing::debug!(
            "Added {} facade {} with {} nodes.",
            facade.type_name(),
            facade.label(),
            facade.subgraph().nodes().len()
        );
        self.facades.push(facade);
        Ok(())
    }

    /// Attaches the nodes and flows of the given subgraph.
    ///
    /// All checks run before the energy system is touched, so a failed commit
    /// leaves it unchanged.
    fn commit(&mut self, subgraph: Subgraph) -> Result<(), Error> {
        self.check_subgraph(&subgraph)?;

        for node in subgraph.nodes() {
            let idx = self.graph.add_node(node.clone());
            self.node_indices.insert(node.label().to_string(), idx);
        }
        for (connection, flow) in subgraph.flows() {
            let source_idx = self.node_indices[connection.source()];
            let target_idx = self.node_indices[connection.target()];
            self.flows.insert((source_idx, target_idx), flow.clone());
            self.graph.add_edge(source_idx, target_idx, ());
        }

        Ok(())
    }

    fn check_subgraph(&self, subgraph: &Subgraph) -> Result<(), Error> {
        let mut labels = HashSet::new();
        for node in subgraph.nodes() {
            let label = node.label();
            if label.is_empty() {
                return Err(Error::invalid_energy_system(format!(
                    "{} has an empty label.",
                    node.kind()
                )));
            }
            if self.node_indices.contains_key(label) || !labels.insert(label) {
                return Err(Error::invalid_energy_system(format!(
                    "Duplicate node label found: {label}"
                )));
            }
        }

        let mut pairs = HashSet::new();
        for (connection, _) in subgraph.flows() {
            let (source, target) = (connection.source(), connection.target());

            if source == target {
                return Err(Error::invalid_connection(format!(
                    "Connection:{connection} Can't connect a node to itself."
                )));
            }
            for label in [source, target] {
                if !labels.contains(label) && !self.node_indices.contains_key(label) {
                    return Err(Error::invalid_connection(format!(
                        "Connection:{connection} Can't find a node with label {label}"
                    )));
                }
            }
            let exists = match (self.node_indices.get(source), self.node_indices.get(target)) {
                (Some(s), Some(t)) => self.flows.contains_key(&(*s, *t)),
                _ => false,
            };
            if exists || !pairs.insert((source, target)) {
                return Err(Error::invalid_connection(format!(
                    "Connection:{connection} Duplicate flow found."
                )));
            }
        }

        Ok(())
    }
}

// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A scratch container of nodes and flows that is assembled in isolation and
//! attached to an [`EnergySystem`][crate::EnergySystem] in a single step.

use crate::{Flow, Node};

/// The endpoints of a directed flow, identified by node labels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    source: String,
    target: String,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns the label of the node the flow leaves.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the label of the node the flow enters.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.source, self.target)
    }
}

/// Nodes and flows that are not yet part of an energy system.
///
/// Flows may refer to nodes of the subgraph and to nodes that already exist
/// in the energy system the subgraph is committed to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subgraph {
    nodes: Vec<Node>,
    flows: Vec<(Connection, Flow)>,
}

impl Subgraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its label.
    pub fn add_node(&mut self, node: Node) -> String {
        let label = node.label().to_string();
        self.nodes.push(node);
        label
    }

    /// Adds a flow and returns its connection.
    pub fn connect(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        flow: Flow,
    ) -> Connection {
        let connection = Connection::new(source, target);
        self.flows.push((connection.clone(), flow));
        connection
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn flows(&self) -> &[(Connection, Flow)] {
        &self.flows
    }

    /// Returns the node with the given label, if it is part of the subgraph.
    pub fn node(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label() == label)
    }

    /// Returns the flow for the given connection, if it is part of the
    /// subgraph.
    pub fn flow(&self, connection: &Connection) -> Option<&Flow> {
        self.flows
            .iter()
            .find(|(c, _)| c == connection)
            .map(|(_, flow)| flow)
    }

    /// Returns the flows entering the node with the given label.
    pub fn inputs<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.flows
            .iter()
            .map(|(c, _)| c)
            .filter(move |c| c.target() == label)
    }

    /// Returns the flows leaving the node with the given label.
    pub fn outputs<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.flows
            .iter()
            .map(|(c, _)| c)
            .filter(move |c| c.source() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sequence;

    #[test]
    fn test_subgraph() {
        let mut subgraph = Subgraph::new();
        let storage = subgraph.add_node(Node::sink("storage"));
        let input = subgraph.connect("h2", &storage, Flow::new());
        let output = subgraph.connect(&storage, "ch4", Flow::new().with_variable_costs(1.0));

        assert_eq!(input, Connection::new("h2", "storage"));
        assert_eq!(output.to_string(), "(storage, ch4)");
        assert_eq!(subgraph.nodes().len(), 1);
        assert!(subgraph.node("storage").is_some());
        assert!(subgraph.node("h2").is_none());
        assert!(subgraph.inputs("storage").eq([&input]));
        assert!(subgraph.outputs("storage").eq([&output]));
        assert_eq!(
            subgraph.flow(&output).and_then(|f| f.variable_costs.clone()),
            Some(Sequence::from(1.0))
        );
    }
}

// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Iterators over nodes and flows in an `EnergySystem`.

use petgraph::graph::DiGraph;

use crate::{EnergySystem, Flow, Node};

/// An iterator over the nodes in an `EnergySystem`.
pub struct Nodes<'a> {
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Node<Node>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|n| &n.weight)
    }
}

/// An iterator over the flows in an `EnergySystem`, yielding the source node,
/// the target node and the flow parameters.
pub struct Flows<'a> {
    pub(crate) es: &'a EnergySystem,
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Edge<()>>,
}

impl<'a> Iterator for Flows<'a> {
    type Item = (&'a Node, &'a Node, &'a Flow);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().and_then(|e| {
            let (source, target) = (e.source(), e.target());
            self.es
                .flows
                .get(&(source, target))
                .map(|flow| (&self.es.graph[source], &self.es.graph[target], flow))
        })
    }
}

/// An iterator over the neighbors of a node in an `EnergySystem`.
pub struct Neighbors<'a> {
    pub(crate) graph: &'a DiGraph<Node, ()>,
    pub(crate) iter: petgraph::graph::Neighbors<'a, ()>,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|i| &self.graph[i])
    }
}

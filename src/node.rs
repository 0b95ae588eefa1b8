// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Node` struct and the `NodeKind` enum, which
//! represent the elements of an energy system network.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::Sequence;

/// A commodity pool that balances the flows attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Bus {
    /// Whether inflows and outflows must sum to zero in every time step.
    pub balanced: bool,
}

/// A node that converts its inflows into its outflows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Converter {
    /// Conversion factors keyed by the label of the neighbouring node.
    ///
    /// Neighbours without an entry have a conversion factor of 1.
    pub conversion_factors: BTreeMap<String, Sequence>,
}

impl Converter {
    /// Returns the conversion factor for the flow from or to the given
    /// neighbour.
    pub fn conversion_factor(&self, neighbour: &str) -> Sequence {
        self.conversion_factors
            .get(neighbour)
            .cloned()
            .unwrap_or(Sequence::Scalar(1.0))
    }
}

/// A node that stores a commodity between time steps.
#[derive(Clone, Debug, PartialEq)]
pub struct Storage {
    pub nominal_storage_capacity: f64,
    /// Upper bound of the storage level relative to the nominal capacity.
    pub max_storage_level: Option<Sequence>,
    /// Relative storage loss per time step.
    pub loss_rate: Sequence,
    pub inflow_conversion_factor: Sequence,
    pub outflow_conversion_factor: Sequence,
    /// Storage level at the start of the horizon, relative to the nominal
    /// capacity.  The optimizer chooses it freely when `None`.
    pub initial_storage_level: Option<f64>,
}

impl Storage {
    /// Creates a lossless storage with the given capacity and conversion
    /// factors of 1.
    pub fn new(capacity: &Sequence) -> Self {
        let (peak, shape) = capacity.split_peak();
        Self {
            nominal_storage_capacity: peak,
            max_storage_level: shape,
            loss_rate: Sequence::Scalar(0.0),
            inflow_conversion_factor: Sequence::Scalar(1.0),
            outflow_conversion_factor: Sequence::Scalar(1.0),
            initial_storage_level: None,
        }
    }

    pub(crate) fn sequences(&self) -> impl Iterator<Item = (&'static str, &Sequence)> {
        [
            ("max_storage_level", self.max_storage_level.as_ref()),
            ("loss_rate", Some(&self.loss_rate)),
            ("inflow_conversion_factor", Some(&self.inflow_conversion_factor)),
            (
                "outflow_conversion_factor",
                Some(&self.outflow_conversion_factor),
            ),
        ]
        .into_iter()
        .filter_map(|(name, seq)| seq.map(|s| (name, s)))
    }
}

/// The variant-specific data of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    Bus(Bus),
    Source,
    Sink,
    Converter(Converter),
    Storage(Storage),
}

/// Represents the kind of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Bus,
    Source,
    Sink,
    Converter,
    Storage,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Bus => write!(f, "Bus"),
            NodeKind::Source => write!(f, "Source"),
            NodeKind::Sink => write!(f, "Sink"),
            NodeKind::Converter => write!(f, "Converter"),
            NodeKind::Storage => write!(f, "Storage"),
        }
    }
}

/// A labelled element of an energy system.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    label: String,
    carrier: Option<String>,
    tech: Option<String>,
    component: Component,
}

impl Node {
    fn new(label: impl Into<String>, component: Component) -> Self {
        Self {
            label: label.into(),
            carrier: None,
            tech: None,
            component,
        }
    }

    /// Creates a bus.
    pub fn bus(label: impl Into<String>, balanced: bool) -> Self {
        Self::new(label, Component::Bus(Bus { balanced }))
    }

    /// Creates a source.
    pub fn source(label: impl Into<String>) -> Self {
        Self::new(label, Component::Source)
    }

    /// Creates a sink.
    pub fn sink(label: impl Into<String>) -> Self {
        Self::new(label, Component::Sink)
    }

    /// Creates a converter.
    pub fn converter(label: impl Into<String>, converter: Converter) -> Self {
        Self::new(label, Component::Converter(converter))
    }

    /// Creates a storage.
    pub fn storage(label: impl Into<String>, storage: Storage) -> Self {
        Self::new(label, Component::Storage(storage))
    }

    /// Tags the node with a carrier and a technology.
    pub fn with_tags(mut self, carrier: impl Into<String>, tech: impl Into<String>) -> Self {
        self.carrier = Some(carrier.into());
        self.tech = Some(tech.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn carrier(&self) -> Option<&str> {
        self.carrier.as_deref()
    }

    pub fn tech(&self) -> Option<&str> {
        self.tech.as_deref()
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Returns the kind of the node.
    pub fn kind(&self) -> NodeKind {
        match self.component {
            Component::Bus(_) => NodeKind::Bus,
            Component::Source => NodeKind::Source,
            Component::Sink => NodeKind::Sink,
            Component::Converter(_) => NodeKind::Converter,
            Component::Storage(_) => NodeKind::Storage,
        }
    }

    /// Returns the converter data, if the node is a converter.
    pub fn as_converter(&self) -> Option<&Converter> {
        match &self.component {
            Component::Converter(converter) => Some(converter),
            _ => None,
        }
    }

    /// Returns the storage data, if the node is a storage.
    pub fn as_storage(&self) -> Option<&Storage> {
        match &self.component {
            Component::Storage(storage) => Some(storage),
            _ => None,
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.label)
    }
}

/// Predicates for checking the kind of a `Node`.
pub(crate) trait KindPredicates {
    fn node_kind(&self) -> NodeKind;

    fn is_bus(&self) -> bool {
        self.node_kind() == NodeKind::Bus
    }
}

impl KindPredicates for Node {
    fn node_kind(&self) -> NodeKind {
        self.kind()
    }
}

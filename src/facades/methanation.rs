// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A methanation reactor that converts hydrogen and carbon dioxide into
//! methane.
//!
//! The reactor expands into four nodes:
//!
//! ```text
//!  h2 ──┐
//!       ├─> combination ─> storage_educts ─> reaction ─> storage_products ─> ch4
//!  co2 ─┘
//! ```
//!
//! The combination converter mixes the educts at a fixed stoichiometric
//! ratio, the reaction converter applies the methanation efficiency, and the
//! operating mode decides how the product storage may feed the methane bus.

mod mode;
mod params;

pub use mode::MethanationMode;
pub use params::MethanationReactorParams;

use std::collections::BTreeMap;

use crate::node::KindPredicates;
use crate::{
    Connection, Converter, EnergySystem, Error, Facade, Flow, Node, Sequence, Storage, Subgraph,
};

/// Hydrogen input per unit of combined educts.
pub const MIX_RATIO_H2: f64 = 1.0;

/// Carbon dioxide input in t per MWh of hydrogen.
pub const MIX_RATIO_CO2: f64 = 0.139;

/// Minimum load of non-convex flows, relative to their nominal value.
pub const MIN_FLOW: f64 = 0.2;

// Positions in the subgraph, in construction order.
const STORAGE_EDUCTS: usize = 0;
const COMBINATION: usize = 1;
const STORAGE_PRODUCTS: usize = 2;
const REACTION: usize = 3;

const CHARGE_FLOW: usize = 2;
const OUTPUT_FLOW: usize = 5;

/// A methanation reactor facade.
///
/// The node carrying the reactor's own label is the reaction converter; the
/// combination converter and both storages are its subnodes.
#[derive(Clone, Debug, PartialEq)]
pub struct MethanationReactor {
    label: String,
    mode: MethanationMode,
    subgraph: Subgraph,
    input: Connection,
    output: Connection,
}

impl MethanationReactor {
    /// The name methanation reactors are registered under in a
    /// [`FacadeRegistry`][crate::FacadeRegistry].
    pub const TYPE_NAME: &'static str = "methanation_reactor";

    /// Builds a methanation reactor whose flows attach to buses of the given
    /// energy system.
    ///
    /// The energy system is only read; add the returned reactor with
    /// [`EnergySystem::add_facade`] to attach it.
    pub fn try_new(params: MethanationReactorParams, es: &EnergySystem) -> Result<Self, Error> {
        let refs = params.validate()?;
        for bus in [refs.h2_bus, refs.co2_bus, refs.ch4_bus] {
            ensure_bus(es, bus)?;
        }

        let label = params.label.as_str();
        let mode = params.methanation_option;
        let tag = |node: Node| node.with_tags(refs.carrier, refs.tech);

        let mut output_flow = mode.output_flow(
            params.capacity_discharge.as_ref(),
            params.methanation_rate.as_ref(),
        )?;
        let mut charge_flow = params
            .capacity_charge
            .as_ref()
            .map(Flow::with_capacity)
            .unwrap_or_default();
        if params.nonconvex {
            make_nonconvex(&mut charge_flow, label, "charge")?;
            make_nonconvex(&mut output_flow, label, "output")?;
        }
        output_flow.variable_costs = Some(params.marginal_cost.clone());
        output_flow.extend_custom_attributes(&params.output_parameters)?;

        let mut input_flow = Flow::new();
        input_flow.extend_custom_attributes(&params.input_parameters)?;

        let mut subgraph = Subgraph::new();

        let mut educts = Storage::new(refs.storage_capacity_educts);
        educts.inflow_conversion_factor = params.efficiency_charge.clone();
        educts.loss_rate = params.loss_rate_educts.clone();
        educts.initial_storage_level = params.initial_storage_level_educts;
        let storage_educts =
            subgraph.add_node(tag(Node::storage(format!("{label}-storage_educts"), educts)));

        let combination = subgraph.add_node(tag(Node::converter(
            format!("{label}-combination"),
            Converter {
                conversion_factors: BTreeMap::from([
                    (refs.h2_bus.to_string(), Sequence::Scalar(MIX_RATIO_H2)),
                    (refs.co2_bus.to_string(), Sequence::Scalar(MIX_RATIO_CO2)),
                ]),
            },
        )));

        let mut products = Storage::new(refs.storage_capacity_products);
        products.outflow_conversion_factor = params.efficiency_discharge.clone();
        products.initial_storage_level = params.initial_storage_level_products;
        let storage_products =
            subgraph.add_node(tag(Node::storage(format!("{label}-storage_products"), products)));

        subgraph.add_node(tag(Node::converter(
            label,
            Converter {
                conversion_factors: BTreeMap::from([
                    (storage_educts.clone(), Sequence::Scalar(1.0)),
                    (
                        storage_products.clone(),
                        params.efficiency_methanation.clone(),
                    ),
                ]),
            },
        )));

        let input = subgraph.connect(refs.h2_bus, &combination, input_flow);
        subgraph.connect(refs.co2_bus, &combination, Flow::new());
        subgraph.connect(&combination, &storage_educts, charge_flow);
        subgraph.connect(&storage_educts, label, Flow::new());
        subgraph.connect(label, &storage_products, Flow::new());
        let output = subgraph.connect(&storage_products, refs.ch4_bus, output_flow);

        tracing::debug!(
            "Assembled methanation reactor {} in mode {} (nonconvex: {}).",
            label,
            mode,
            params.nonconvex
        );

        Ok(Self {
            label: params.label.clone(),
            mode,
            subgraph,
            input,
            output,
        })
    }

    /// Builds a methanation reactor from a scenario record.
    pub fn from_record(record: serde_json::Value, es: &EnergySystem) -> Result<Self, Error> {
        let params: MethanationReactorParams = serde_json::from_value(record).map_err(|e| {
            Error::invalid_configuration(format!("Invalid {} record: {e}", Self::TYPE_NAME))
        })?;
        Self::try_new(params, es)
    }

    /// Returns the operating mode of the reactor.
    pub fn mode(&self) -> MethanationMode {
        self.mode
    }

    /// Returns the converter that mixes hydrogen and carbon dioxide.
    pub fn combination(&self) -> &Node {
        &self.subgraph.nodes()[COMBINATION]
    }

    /// Returns the storage holding the mixed educts.
    pub fn storage_educts(&self) -> &Node {
        &self.subgraph.nodes()[STORAGE_EDUCTS]
    }

    /// Returns the storage holding the produced methane.
    pub fn storage_products(&self) -> &Node {
        &self.subgraph.nodes()[STORAGE_PRODUCTS]
    }

    /// Returns the converter between the two storages.
    pub fn reaction(&self) -> &Node {
        &self.subgraph.nodes()[REACTION]
    }

    /// Returns the flow from the combination converter into the educt
    /// storage.
    pub fn charge_flow(&self) -> &Flow {
        &self.subgraph.flows()[CHARGE_FLOW].1
    }

    /// Returns the flow from the product storage to the methane bus.
    pub fn output_flow(&self) -> &Flow {
        &self.subgraph.flows()[OUTPUT_FLOW].1
    }
}

impl Facade for MethanationReactor {
    fn label(&self) -> &str {
        &self.label
    }

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn subgraph(&self) -> &Subgraph {
        &self.subgraph
    }

    fn inputs(&self) -> &[Connection] {
        std::slice::from_ref(&self.input)
    }

    fn outputs(&self) -> &[Connection] {
        std::slice::from_ref(&self.output)
    }
}

fn ensure_bus(es: &EnergySystem, label: &str) -> Result<(), Error> {
    let node = es.node(label).map_err(|_| {
        Error::invalid_configuration(format!("Bus {label} not found in the energy system."))
    })?;
    if !node.is_bus() {
        return Err(Error::invalid_configuration(format!("{node} is not a bus.")));
    }
    Ok(())
}

/// Applies the non-convex minimum load to a flow and returns the minimum set
/// by the operating mode that it replaced, if any.
fn make_nonconvex(flow: &mut Flow, label: &str, name: &str) -> Result<Option<Sequence>, Error> {
    if flow.nominal_value.is_none() {
        return Err(Error::invalid_configuration(format!(
            "The {name} flow of {label} needs a capacity to be non-convex."
        )));
    }
    let replaced = flow.set_nonconvex_min(MIN_FLOW);
    if let Some(replaced) = &replaced {
        tracing::warn!(
            "Non-convex minimum load {} replaces {} on the {} flow of {}.",
            MIN_FLOW,
            replaced,
            name,
            label
        );
    }
    Ok(replaced)
}

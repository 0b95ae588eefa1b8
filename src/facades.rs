// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Facades: composite components that expand into several primitive nodes
//! of an energy system.

mod methanation;
mod registry;

pub use methanation::{
    MethanationMode, MethanationReactor, MethanationReactorParams, MIN_FLOW, MIX_RATIO_CO2,
    MIX_RATIO_H2,
};
pub use registry::{FacadeFactory, FacadeRegistry};

use crate::{Connection, Node, Subgraph};

/**
This trait needs to be implemented by composite components that are added to
an [`EnergySystem`][crate::EnergySystem].

A facade is fully assembled before it is added: its [`subgraph`][Facade::subgraph]
holds every node and flow it contributes, and the energy system attaches them
all at once.

<details>
<summary>Example implementation for a storage with separate charge and discharge units:</summary>

```ignore
impl Facade for ChargedStorage {
    fn label(&self) -> &str {
        &self.label
    }

    fn type_name(&self) -> &'static str {
        "charged_storage"
    }

    fn subgraph(&self) -> &Subgraph {
        &self.subgraph
    }

    fn inputs(&self) -> &[Connection] {
        std::slice::from_ref(&self.charge)
    }

    fn outputs(&self) -> &[Connection] {
        std::slice::from_ref(&self.discharge)
    }
}
```

</details>
*/
pub trait Facade: Send + Sync {
    /// Returns the label of the facade.
    fn label(&self) -> &str;

    /// Returns the name the facade type is registered under.
    fn type_name(&self) -> &'static str;

    /// Returns all nodes and flows the facade adds to an energy system.
    fn subgraph(&self) -> &Subgraph;

    /// Returns the flows that connect external buses to the facade.
    fn inputs(&self) -> &[Connection];

    /// Returns the flows that connect the facade to external buses.
    fn outputs(&self) -> &[Connection];

    /// Returns the nodes owned by the facade, other than the node that
    /// carries the facade's own label.
    fn subnodes(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        Box::new(
            self.subgraph()
                .nodes()
                .iter()
                .filter(|n| n.label() != self.label()),
        )
    }
}

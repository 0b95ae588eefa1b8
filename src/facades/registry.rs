// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A registry that maps facade type names to factories, so that facades can
//! be created from declarative records.

use std::collections::HashMap;

use crate::{EnergySystem, Error, Facade};

use super::methanation::MethanationReactor;

/// Creates a facade from a declarative record, resolving bus references
/// against the given energy system.
pub type FacadeFactory = fn(serde_json::Value, &EnergySystem) -> Result<Box<dyn Facade>, Error>;

/// Maps facade type names, as used in scenario records, to their factories.
///
/// A registry is an explicit value owned by whoever loads scenarios; it is
/// never consulted implicitly.
#[derive(Clone, Default)]
pub struct FacadeRegistry {
    factories: HashMap<String, FacadeFactory>,
}

impl FacadeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with all facades of this crate registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(MethanationReactor::TYPE_NAME.to_string(), |record, es| {
                Ok(Box::new(MethanationReactor::from_record(record, es)?))
            });
        registry
    }

    /// Registers a factory under the given type name.
    ///
    /// Returns an error if the type name is taken.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        factory: FacadeFactory,
    ) -> Result<(), Error> {
        let type_name = type_name.into();
        if self.factories.contains_key(&type_name) {
            return Err(Error::invalid_configuration(format!(
                "Facade type {type_name} is registered already."
            )));
        }
        self.factories.insert(type_name, factory);
        Ok(())
    }

    /// Returns true if a factory is registered under the given type name.
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Creates a facade of the given type from a record.
    pub fn build(
        &self,
        type_name: &str,
        record: serde_json::Value,
        es: &EnergySystem,
    ) -> Result<Box<dyn Facade>, Error> {
        let factory = self.factories.get(type_name).ok_or_else(|| {
            Error::invalid_configuration(format!("Unknown facade type: {type_name}"))
        })?;
        factory(record, es)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::energy_system::test_utils::EnergySystemBuilder;
    use crate::ErrorKind;

    fn record() -> serde_json::Value {
        json!({
            "label": "m_reactor",
            "carrier": "h2_co2",
            "tech": "methanation_reactor",
            "h2_bus": "h2",
            "co2_bus": "co2",
            "ch4_bus": "ch4",
            "capacity_charge": 50,
            "capacity_discharge": 50,
            "storage_capacity_educts": 100,
            "storage_capacity_products": 1000,
            "methanation_rate": [5, 4, 5],
            "efficiency_methanation": 0.93,
            "methanation_option": "variable_rate"
        })
    }

    #[test]
    fn test_build() -> Result<(), Error> {
        let registry = FacadeRegistry::with_defaults();
        assert!(registry.contains("methanation_reactor"));

        let mut es = EnergySystemBuilder::new().timesteps(3).with_sinks().build()?;
        let facade = registry.build("methanation_reactor", record(), &es)?;
        assert_eq!(facade.type_name(), "methanation_reactor");
        assert_eq!(facade.label(), "m_reactor");

        es.add_boxed_facade(facade)?;
        es.validate()?;
        assert_eq!(es.facade("m_reactor")?.subnodes().count(), 3);
        assert_eq!(es.flow("m_reactor-storage_products", "ch4")?.nominal_value, Some(5.0));

        Ok(())
    }

    #[test]
    fn test_unknown_type() -> Result<(), Error> {
        let es = EnergySystemBuilder::new().build()?;
        assert!(FacadeRegistry::new()
            .build("methanation_reactor", record(), &es)
            .is_err_and(|e| e
                == Error::invalid_configuration("Unknown facade type: methanation_reactor")));
        Ok(())
    }

    #[test]
    fn test_register() {
        let mut registry = FacadeRegistry::new();
        let factory: FacadeFactory = |record, es| {
            Ok(Box::new(MethanationReactor::from_record(record, es)?))
        };
        assert!(registry.register("reactor", factory).is_ok());
        assert!(registry.register("reactor", factory).is_err_and(|e| e
            == Error::invalid_configuration("Facade type reactor is registered already.")));
    }

    #[test]
    fn test_unknown_mode_attaches_nothing() -> Result<(), Error> {
        let registry = FacadeRegistry::with_defaults();
        let es = EnergySystemBuilder::new().build()?;
        let mut record = record();
        record["methanation_option"] = json!("educt_limited_rate");

        let result = registry.build("methanation_reactor", record, &es);
        assert!(result.is_err_and(|e| e.kind() == ErrorKind::InvalidConfiguration
            && e.description()
                .contains("unknown operating mode: educt_limited_rate")));
        for bus in ["h2", "co2", "ch4"] {
            assert_eq!(es.inputs(bus)?.count() + es.outputs(bus)?.count(), 0);
        }

        Ok(())
    }

    #[test]
    fn test_expandable_record() -> Result<(), Error> {
        let registry = FacadeRegistry::with_defaults();
        let es = EnergySystemBuilder::new().build()?;
        let mut record = record();
        record["expandable"] = json!(true);

        assert!(registry
            .build("methanation_reactor", record, &es)
            .is_err_and(|e| e.kind() == ErrorKind::UnsupportedFeature));

        Ok(())
    }
}

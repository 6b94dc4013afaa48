//! Component catalog
//!
//! The catalog is a read-only registry of every component a user can place.
//! It is built once and shared; nothing mutates it after construction.
//!
//! Lookups that miss are not errors: saved diagrams may reference components
//! from an older or newer catalog, and callers skip those cells.

use crate::types::{ComponentCategory, Direction, PortType};
use serde::Serialize;
use std::sync::OnceLock;

/// Identifier of the port-less pseudo-component that carries free text
pub const LABEL_COMPONENT_ID: &str = "label";

/// A named, typed attachment point on a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Port {
    /// Unique within the owning component (e.g. `"p1"`)
    pub id: String,
    #[serde(rename = "type")]
    pub port_type: PortType,
    /// Direction the port faces at rotation 0
    pub direction: Direction,
}

impl Port {
    pub fn new(id: impl Into<String>, port_type: PortType, direction: Direction) -> Self {
        Self {
            id: id.into(),
            port_type,
            direction,
        }
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDefinition {
    pub id: String,
    pub name: String,
    pub category: ComponentCategory,
    /// Ports in declaration order
    pub ports: Vec<Port>,
}

impl ComponentDefinition {
    /// Look up a port by id
    pub fn port(&self, port_id: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == port_id)
    }
}

/// Read-only registry of component definitions
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    components: Vec<ComponentDefinition>,
}

impl Catalog {
    /// Build a catalog from an explicit list of definitions
    pub fn new(components: Vec<ComponentDefinition>) -> Self {
        Self { components }
    }

    /// Shared instance of [`Catalog::builtin`], built on first use
    pub fn global() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Catalog::builtin)
    }

    /// Find a component definition by exact id
    pub fn get(&self, id: &str) -> Option<&ComponentDefinition> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The stock irrigation parts list
    pub fn builtin() -> Self {
        use ComponentCategory::{Connector, Emitter, Fitting};
        use Direction::{East, North, South, West};
        use PortType::{Barb, FemaleThread, MaleThread, Slip};

        let slip = |dirs: &[Direction]| -> Vec<Port> {
            dirs.iter()
                .enumerate()
                .map(|(i, d)| Port::new(format!("p{}", i + 1), Slip, *d))
                .collect()
        };
        let single = |port_type, dir| vec![Port::new("p1", port_type, dir)];
        let def = |id: &str, name: &str, category, ports| ComponentDefinition {
            id: id.to_string(),
            name: name.to_string(),
            category,
            ports,
        };

        Self::new(vec![
            def("pipe_straight", "Straight (Coupling) horizontal", Connector, slip(&[West, East])),
            def("pipe_straight_v", "Straight (Coupling) vertical", Connector, slip(&[North, South])),
            def("elbow_90", "90° Elbow (E–S)", Fitting, slip(&[East, South])),
            def("elbow_90_ne", "90° Elbow (N–E)", Fitting, slip(&[North, East])),
            def("elbow_90_sw", "90° Elbow (S–W)", Fitting, slip(&[South, West])),
            def("elbow_90_wn", "90° Elbow (W–N)", Fitting, slip(&[West, North])),
            def("tee", "Tee (branch S)", Fitting, slip(&[East, West, South])),
            def("tee_e", "Tee (branch E)", Fitting, slip(&[South, North, East])),
            def("tee_n", "Tee (branch N)", Fitting, slip(&[East, West, North])),
            def("tee_w", "Tee (branch W)", Fitting, slip(&[South, North, West])),
            def(
                "male_adapter",
                "Male Adapter",
                Connector,
                vec![Port::new("p1", Slip, East), Port::new("p2", MaleThread, West)],
            ),
            def("drip_emitter_2lph", "Drip Emitter (2 L/h)", Emitter, single(Barb, South)),
            def("drip_emitter_4lph", "Drip Emitter (4 L/h)", Emitter, single(Barb, South)),
            def("drip_emitter_8lph", "Drip Emitter (8 L/h)", Emitter, single(Barb, South)),
            def("tap", "Tap", Connector, single(FemaleThread, East)),
            def(LABEL_COMPONENT_ID, "Text label", Connector, Vec::new()),
        ])
    }
}

//! dripgrid library
//!
//! Grid connectivity engine for drip irrigation layouts: a component catalog,
//! pure snapshot-in/snapshot-out editing operations, connection derivation,
//! the JSON exchange document and an undo-aware editor store.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod seed;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use catalog::{Catalog, ComponentDefinition, LABEL_COMPONENT_ID, Port};
pub use config::EditorConfig;
pub use document::{
    Document, ImportedDocument, SkippedEntry, export_document, import_document, read_document_file,
    write_document_file,
};
pub use engine::geometry::{adjacent_cell, ports_compatible, rotate_direction, rotate_direction_by_degrees};
pub use engine::grid::{CellKey, GridBounds, GridState, PlacedComponent};
pub use engine::{Connection, ConnectionEnd, GridEngine, Rejection, ValidConnectionTarget};
pub use error::DripGridError;
pub use store::{ActionResult, DEFAULT_ZOOM, GridStore, LoadSummary};
pub use types::{ComponentCategory, Direction, PortType, Rotation};

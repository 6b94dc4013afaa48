//! Starter layout shipped with the editor.
//!
//! A tap feeds a male adapter, a short pipe run, a tee and an elbow that
//! drops onto a 2 L/h drip emitter. Stored in the exchange format so it goes
//! through the same import path as user documents.

use crate::document::{ImportedDocument, import_document};
use crate::engine::grid::GridBounds;
use crate::error::Result;

pub const SEED_DOCUMENT: &str = r#"{"version":1,"gridWidth":20,"gridHeight":20,"placed":[{"componentId":"tap","x":2,"y":5,"rotation":0},{"componentId":"male_adapter","x":3,"y":5,"rotation":0},{"componentId":"pipe_straight","x":4,"y":5,"rotation":0},{"componentId":"tee","x":5,"y":5,"rotation":0},{"componentId":"elbow_90","x":6,"y":5,"rotation":90},{"componentId":"drip_emitter_2lph","x":6,"y":6,"rotation":180}],"name":"Starter layout"}"#;

/// Parse the bundled starter layout
pub fn seed_document() -> Result<ImportedDocument> {
    import_document(SEED_DOCUMENT, GridBounds::default())
}

//! Diagram exchange document
//!
//! A diagram is saved as a versioned JSON object:
//!
//! ```json
//! {
//!   "version": 1,
//!   "gridWidth": 20,
//!   "gridHeight": 20,
//!   "placed": [{ "componentId": "tee", "x": 5, "y": 5, "rotation": 0 }],
//!   "zoom": 1.0,
//!   "name": "Back garden"
//! }
//! ```
//!
//! # Import rules
//!
//! - Text that is not valid JSON, or whose root is not an object, fails the
//!   import with [`DripGridError::Import`].
//! - Individual `placed` entries that are malformed (missing fields, a rotation
//!   outside 0/90/180/270, non-integer coordinates, outside the declared grid)
//!   are skipped and reported, never fatal.
//! - Unknown component ids are kept; the engine skips them at lookup time.
//! - `zoom` outside `[0.5, 2]` is dropped; an absent or blank `name` becomes
//!   [`DEFAULT_DOCUMENT_NAME`].

use crate::engine::grid::{GridBounds, GridState, PlacedComponent};
use crate::error::{DripGridError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Schema version written by [`export_document`]
pub const DOCUMENT_VERSION: u32 = 1;

/// Name used when a document does not carry one
pub const DEFAULT_DOCUMENT_NAME: &str = "Untitled plan";

/// Smallest zoom factor a document may carry
pub const ZOOM_MIN: f64 = 0.5;
/// Largest zoom factor a document may carry
pub const ZOOM_MAX: f64 = 2.0;

/// A diagram as stored on disk
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub bounds: GridBounds,
    pub grid: GridState,
    pub zoom: Option<f64>,
    pub name: String,
}

impl Document {
    pub fn new(bounds: GridBounds, grid: GridState) -> Self {
        Self {
            bounds,
            grid,
            zoom: None,
            name: DEFAULT_DOCUMENT_NAME.to_string(),
        }
    }
}

/// A `placed` entry that was dropped during import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position in the `placed` array
    pub index: usize,
    pub reason: String,
}

/// Outcome of a successful (possibly partial) import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDocument {
    pub document: Document,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentWire<'a> {
    version: u32,
    grid_width: i32,
    grid_height: i32,
    placed: Vec<&'a PlacedComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zoom: Option<f64>,
    name: &'a str,
}

/// Serialize a document as pretty-printed JSON
pub fn export_document(document: &Document) -> Result<String> {
    let wire = DocumentWire {
        version: DOCUMENT_VERSION,
        grid_width: document.bounds.width,
        grid_height: document.bounds.height,
        placed: document.grid.iter().collect(),
        zoom: document.zoom,
        name: &document.name,
    };
    let json = serde_json::to_string_pretty(&wire)?;
    debug!("exported document '{}' with {} component(s)", document.name, document.grid.len());
    Ok(json)
}

/// Parse a document, salvaging every well-formed entry.
///
/// `fallback` supplies the grid size when the document omits or garbles
/// `gridWidth`/`gridHeight`.
pub fn import_document(json: &str, fallback: GridBounds) -> Result<ImportedDocument> {
    let root: Value = serde_json::from_str(json)
        .map_err(|e| DripGridError::import(format!("document is not valid JSON: {}", e)))?;
    let Value::Object(root) = root else {
        return Err(DripGridError::import("document root must be a JSON object"));
    };

    if let Some(version) = root.get("version") {
        if version.as_u64() != Some(u64::from(DOCUMENT_VERSION)) {
            warn!("document version {} is not {}, importing best-effort", version, DOCUMENT_VERSION);
        }
    }

    let bounds = GridBounds::new(
        dimension(root.get("gridWidth")).unwrap_or(fallback.width),
        dimension(root.get("gridHeight")).unwrap_or(fallback.height),
    );

    let entries: &[Value] = match root.get("placed") {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            warn!("'placed' is not an array ({}), importing an empty grid", type_name(other));
            &[]
        }
        None => &[],
    };

    let mut grid = GridState::new();
    let mut skipped = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match parse_entry(entry, bounds) {
            Ok(placed) => {
                grid.insert(placed);
            }
            Err(reason) => {
                warn!("skipping placed[{}]: {}", index, reason);
                skipped.push(SkippedEntry { index, reason });
            }
        }
    }

    let zoom = root
        .get("zoom")
        .and_then(Value::as_f64)
        .filter(|z| (ZOOM_MIN..=ZOOM_MAX).contains(z));

    let name = root
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_DOCUMENT_NAME)
        .to_string();

    debug!(
        "imported {} component(s), skipped {}, grid {}x{}",
        grid.len(),
        skipped.len(),
        bounds.width,
        bounds.height
    );

    Ok(ImportedDocument {
        document: Document {
            bounds,
            grid,
            zoom,
            name,
        },
        skipped,
    })
}

/// Read and import a document file
pub fn read_document_file<P: AsRef<Path>>(path: P, fallback: GridBounds) -> Result<ImportedDocument> {
    let content = fs::read_to_string(&path)?;
    let imported = import_document(&content, fallback)?;
    info!("Loaded '{}' from {:?}", imported.document.name, path.as_ref());
    Ok(imported)
}

/// Export `document` and write it to `path`
pub fn write_document_file<P: AsRef<Path>>(document: &Document, path: P) -> Result<()> {
    fs::write(&path, export_document(document)?)?;
    info!("Saved '{}' to {:?}", document.name, path.as_ref());
    Ok(())
}

fn parse_entry(entry: &Value, bounds: GridBounds) -> std::result::Result<PlacedComponent, String> {
    let placed = PlacedComponent::deserialize(entry).map_err(|e| e.to_string())?;
    if !bounds.contains(placed.x, placed.y) {
        return Err(format!(
            "cell ({}, {}) is outside the {}x{} grid",
            placed.x, placed.y, bounds.width, bounds.height
        ));
    }
    Ok(placed)
}

fn dimension(value: Option<&Value>) -> Option<i32> {
    value
        .and_then(Value::as_i64)
        .filter(|v| *v > 0)
        .and_then(|v| i32::try_from(v).ok())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

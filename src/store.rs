//! Editor session state around the pure engine.
//!
//! The store owns the current snapshot, the undo/redo history, the selection
//! and view settings. Every structural change is delegated to
//! [`GridEngine`]; the store only does history bookkeeping around the call.
//!
//! # History
//!
//! History is an ordered list of snapshots with a cursor. A rejected engine
//! call never creates an entry, a new change after an undo discards the redo
//! branch, and the oldest snapshot is dropped once `max_history` is exceeded.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, LABEL_COMPONENT_ID};
use crate::config::EditorConfig;
use crate::document::{Document, SkippedEntry, export_document, import_document};
use crate::engine::connectivity::{Connection, ValidConnectionTarget};
use crate::engine::grid::{CellKey, GridState};
use crate::engine::{EngineResult, GridEngine, Rejection};
use crate::error::Result;
use crate::seed::SEED_DOCUMENT;
use crate::types::Rotation;

/// Zoom factor of a fresh session and of a document that carries none
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Outcome of a store action; `Err` means nothing changed
pub type ActionResult = std::result::Result<(), Rejection>;

/// What a document load brought in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Components now on the grid
    pub placed: usize,
    /// Entries the importer could not read
    pub skipped: Vec<SkippedEntry>,
    /// Components dropped for falling outside this editor's grid
    pub clipped: usize,
}

/// Editor session state
#[derive(Debug, Clone)]
pub struct GridStore {
    engine: GridEngine,
    grid: GridState,
    history: Vec<GridState>,
    history_index: usize,
    max_history: usize,
    zoom: f64,
    zoom_min: f64,
    zoom_max: f64,
    zoom_step: f64,
    selected_catalog_id: Option<String>,
    selection: BTreeSet<CellKey>,
    document_name: String,
    default_document_name: String,
}

impl Default for GridStore {
    fn default() -> Self {
        Self::new(&EditorConfig::default(), Arc::new(Catalog::builtin()))
    }
}

impl GridStore {
    pub fn new(config: &EditorConfig, catalog: Arc<Catalog>) -> Self {
        let grid = GridState::new();
        Self {
            engine: GridEngine::new(catalog, config.bounds()),
            history: vec![grid.clone()],
            grid,
            history_index: 0,
            max_history: config.max_history.max(1),
            zoom: DEFAULT_ZOOM,
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
            zoom_step: config.zoom_step,
            selected_catalog_id: None,
            selection: BTreeSet::new(),
            document_name: config.default_document_name.clone(),
            default_document_name: config.default_document_name.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn selection(&self) -> &BTreeSet<CellKey> {
        &self.selection
    }

    pub fn selected_catalog_id(&self) -> Option<&str> {
        self.selected_catalog_id.as_deref()
    }

    /// Number of snapshots held, including the current one
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history_index + 1 < self.history.len()
    }

    // ------------------------------------------------------------------
    // History bookkeeping
    // ------------------------------------------------------------------

    fn commit(&mut self, action: &str, result: EngineResult) -> ActionResult {
        match result {
            Ok(next) => {
                self.history.truncate(self.history_index + 1);
                self.history.push(next.clone());
                if self.history.len() > self.max_history {
                    let excess = self.history.len() - self.max_history;
                    self.history.drain(..excess);
                }
                self.history_index = self.history.len() - 1;
                self.grid = next;
                debug!("{} committed, history {}/{}", action, self.history_index + 1, self.history.len());
                Ok(())
            }
            Err(rejection) => {
                debug!("{} rejected: {}", action, rejection);
                Err(rejection)
            }
        }
    }

    fn reset_history(&mut self, grid: GridState) {
        self.history = vec![grid.clone()];
        self.history_index = 0;
        self.grid = grid;
        self.selection.clear();
    }

    /// Step back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.history_index -= 1;
        self.grid = self.history[self.history_index].clone();
        self.selection.clear();
        true
    }

    /// Step forward one snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.history_index += 1;
        self.grid = self.history[self.history_index].clone();
        self.selection.clear();
        true
    }

    // ------------------------------------------------------------------
    // Single-cell editing
    // ------------------------------------------------------------------

    pub fn place(
        &mut self,
        component_id: &str,
        x: i32,
        y: i32,
        rotation: Rotation,
    ) -> ActionResult {
        let result = self.engine.place(&self.grid, component_id, x, y, rotation, None);
        self.commit("place", result)
    }

    /// Place a text label at `(x, y)`
    pub fn place_label(&mut self, x: i32, y: i32, text: &str) -> ActionResult {
        let result = self
            .engine
            .place(&self.grid, LABEL_COMPONENT_ID, x, y, Rotation::R0, Some(text));
        self.commit("place label", result)
    }

    /// Place whatever is selected in the catalog palette
    pub fn place_selected(&mut self, x: i32, y: i32, rotation: Rotation) -> ActionResult {
        let id = self
            .selected_catalog_id
            .clone()
            .ok_or_else(|| Rejection::UnknownComponent(String::new()))?;
        self.place(&id, x, y, rotation)
    }

    pub fn remove(&mut self, x: i32, y: i32) -> ActionResult {
        let result = self.engine.remove(&self.grid, x, y);
        self.commit("remove", result)?;
        self.selection.remove(&CellKey::new(x, y));
        Ok(())
    }

    pub fn rotate(&mut self, x: i32, y: i32) -> ActionResult {
        let result = self.engine.rotate(&self.grid, x, y);
        self.commit("rotate", result)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select_catalog(&mut self, component_id: Option<&str>) {
        self.selected_catalog_id = component_id.map(str::to_string);
    }

    /// Replace the selection with the single cell `(x, y)`
    pub fn select_cell(&mut self, x: i32, y: i32) {
        self.selection.clear();
        self.selection.insert(CellKey::new(x, y));
    }

    /// Add `(x, y)` to the selection, or drop it if already selected
    pub fn toggle_cell(&mut self, x: i32, y: i32) {
        let key = CellKey::new(x, y);
        if !self.selection.remove(&key) {
            self.selection.insert(key);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn selected_cells(&self) -> Vec<CellKey> {
        self.selection.iter().copied().collect()
    }

    /// Move every selected component by `(dx, dy)`; the selection follows
    pub fn move_selection(&mut self, dx: i32, dy: i32) -> ActionResult {
        let cells = self.selected_cells();
        let result = self.engine.move_components(&self.grid, &cells, dx, dy);
        self.commit("move selection", result)?;
        self.selection = cells
            .into_iter()
            .filter_map(|key| Some(CellKey::new(key.x.checked_add(dx)?, key.y.checked_add(dy)?)))
            .filter(|key| self.grid.is_occupied(key.x, key.y))
            .collect();
        Ok(())
    }

    pub fn rotate_selection(&mut self) -> ActionResult {
        let cells = self.selected_cells();
        let result = self.engine.rotate_components(&self.grid, &cells);
        self.commit("rotate selection", result)
    }

    pub fn remove_selection(&mut self) -> ActionResult {
        let cells = self.selected_cells();
        let result = self.engine.remove_components(&self.grid, &cells);
        self.commit("remove selection", result)?;
        self.selection.clear();
        Ok(())
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + self.zoom_step).min(self.zoom_max);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - self.zoom_step).max(self.zoom_min);
    }

    /// Set the document name; a blank name falls back to the default
    pub fn set_document_name(&mut self, name: &str) {
        self.document_name = if name.trim().is_empty() {
            self.default_document_name.clone()
        } else {
            name.to_string()
        };
    }

    // ------------------------------------------------------------------
    // Derived queries
    // ------------------------------------------------------------------

    pub fn connections(&self) -> Vec<Connection> {
        self.engine.connections(&self.grid)
    }

    pub fn valid_targets(&self, x: i32, y: i32, port_id: Option<&str>) -> Vec<ValidConnectionTarget> {
        self.engine.valid_connection_targets(&self.grid, x, y, port_id)
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Replace the grid wholesale and start a fresh history
    pub fn load_grid(&mut self, mut grid: GridState) -> usize {
        let clipped = grid.retain_within(self.engine.bounds());
        if clipped > 0 {
            warn!("{} component(s) fall outside the editor grid and were dropped", clipped);
        }
        self.reset_history(grid);
        clipped
    }

    /// Replace the session with `document`
    pub fn load_document(&mut self, document: Document) -> usize {
        let clipped = self.load_grid(document.grid);
        let zoom = document.zoom.unwrap_or(DEFAULT_ZOOM);
        self.zoom = zoom.max(self.zoom_min).min(self.zoom_max);
        self.set_document_name(&document.name);
        clipped
    }

    /// Import a JSON document. On failure the session is left untouched.
    pub fn load_from_json(&mut self, json: &str) -> Result<LoadSummary> {
        let imported = import_document(json, self.engine.bounds())?;
        let clipped = self.load_document(imported.document);
        info!(
            "loaded '{}' with {} component(s)",
            self.document_name,
            self.grid.len()
        );
        Ok(LoadSummary {
            placed: self.grid.len(),
            skipped: imported.skipped,
            clipped,
        })
    }

    /// Load the bundled starter layout
    pub fn load_seed(&mut self) -> Result<LoadSummary> {
        self.load_from_json(SEED_DOCUMENT)
    }

    /// Current session as a document
    pub fn to_document(&self) -> Document {
        Document {
            bounds: self.engine.bounds(),
            grid: self.grid.clone(),
            zoom: Some(self.zoom),
            name: self.document_name.clone(),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        export_document(&self.to_document())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty_with_one_snapshot() {
        let store = GridStore::default();
        assert!(store.grid().is_empty());
        assert_eq!(store.history_len(), 1);
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert_eq!(store.zoom(), 1.0);
    }

    #[test]
    fn test_history_is_capped() {
        let config = EditorConfig {
            max_history: 3,
            ..EditorConfig::default()
        };
        let mut store = GridStore::new(&config, Arc::new(Catalog::builtin()));
        for x in 0..5 {
            store.place("tee", x, 0, Rotation::R0).expect("free cell"); // test: known-good input
        }
        assert_eq!(store.history_len(), 3);
        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
        assert_eq!(store.grid().len(), 3);
    }

    #[test]
    fn test_place_selected_without_palette_choice() {
        let mut store = GridStore::default();
        assert!(store.place_selected(0, 0, Rotation::R0).is_err());
        store.select_catalog(Some("tap"));
        assert!(store.place_selected(0, 0, Rotation::R0).is_ok());
        assert_eq!(store.grid().get(0, 0).map(|p| p.component_id.as_str()), Some("tap"));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut store = GridStore::default();
        for _ in 0..10 {
            store.zoom_in();
        }
        assert_eq!(store.zoom(), 2.0);
        for _ in 0..10 {
            store.zoom_out();
        }
        assert_eq!(store.zoom(), 0.5);
    }

    #[test]
    fn test_blank_name_falls_back() {
        let mut store = GridStore::default();
        store.set_document_name("Front lawn");
        assert_eq!(store.document_name(), "Front lawn");
        store.set_document_name("");
        assert_eq!(store.document_name(), "Untitled plan");
    }
}

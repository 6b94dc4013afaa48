//! Grid snapshot data model
//!
//! A [`GridState`] is a sparse map from cell to [`PlacedComponent`]. Snapshots
//! are plain values: the engine borrows one and hands back a fresh one, so a
//! snapshot kept in undo history never changes underneath its holder.

use crate::types::Rotation;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default grid width in cells
pub const DEFAULT_GRID_WIDTH: i32 = 20;
/// Default grid height in cells
pub const DEFAULT_GRID_HEIGHT: i32 = 20;

/// Key of one grid cell, ordered row-major (y, then x)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub y: i32,
    pub x: i32,
}

impl CellKey {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for CellKey {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Extent of the drawable grid: cells `[0, width) × [0, height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub width: i32,
    pub height: i32,
}

impl GridBounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }
}

/// One component sitting on the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedComponent {
    pub component_id: String,
    pub x: i32,
    pub y: i32,
    pub rotation: Rotation,
    /// Free text, only meaningful on label components. A non-string value in
    /// a document is ignored instead of invalidating the whole entry.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub text: Option<String>,
}

impl PlacedComponent {
    pub fn new(component_id: impl Into<String>, x: i32, y: i32, rotation: Rotation) -> Self {
        Self {
            component_id: component_id.into(),
            x,
            y,
            rotation,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[inline]
    pub const fn key(&self) -> CellKey {
        CellKey::new(self.x, self.y)
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    })
}

/// Immutable-by-convention snapshot of every placed component.
///
/// At most one component occupies a cell; the map key is always the
/// component's own `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridState {
    cells: BTreeMap<CellKey, PlacedComponent>,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Component at `(x, y)`, if any
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&PlacedComponent> {
        self.cells.get(&CellKey::new(x, y))
    }

    #[inline]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cells.contains_key(&CellKey::new(x, y))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Components in row-major cell order
    pub fn iter(&self) -> impl Iterator<Item = &PlacedComponent> {
        self.cells.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.keys().copied()
    }

    /// Insert or replace the component at its own cell.
    ///
    /// Only for building snapshots (import, tests); editing goes through
    /// [`crate::engine::GridEngine`].
    pub fn insert(&mut self, placed: PlacedComponent) -> Option<PlacedComponent> {
        self.cells.insert(placed.key(), placed)
    }

    pub(crate) fn remove_cell(&mut self, key: CellKey) -> Option<PlacedComponent> {
        self.cells.remove(&key)
    }

    pub(crate) fn get_mut(&mut self, key: CellKey) -> Option<&mut PlacedComponent> {
        self.cells.get_mut(&key)
    }

    /// Drop every component outside `bounds`, returning how many were dropped
    pub fn retain_within(&mut self, bounds: GridBounds) -> usize {
        let before = self.cells.len();
        self.cells.retain(|key, _| bounds.contains(key.x, key.y));
        before - self.cells.len()
    }
}

impl FromIterator<PlacedComponent> for GridState {
    fn from_iter<I: IntoIterator<Item = PlacedComponent>>(iter: I) -> Self {
        let mut grid = Self::new();
        for placed in iter {
            grid.insert(placed);
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_key_display() {
        assert_eq!(CellKey::new(3, 5).to_string(), "3,5");
    }

    #[test]
    fn test_cell_key_row_major_order() {
        assert!(CellKey::new(9, 0) < CellKey::new(0, 1));
        assert!(CellKey::new(1, 4) < CellKey::new(2, 4));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = GridBounds::default();
        assert!(bounds.contains(0, 0));
        assert!(bounds.contains(19, 19));
        assert!(!bounds.contains(20, 0));
        assert!(!bounds.contains(0, -1));
    }

    #[test]
    fn test_insert_replaces_same_cell() {
        let mut grid = GridState::new();
        grid.insert(PlacedComponent::new("tee", 1, 1, Rotation::R0));
        let old = grid.insert(PlacedComponent::new("tap", 1, 1, Rotation::R90));
        assert_eq!(old.map(|p| p.component_id), Some("tee".to_string()));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get(1, 1).map(|p| p.component_id.as_str()), Some("tap"));
    }

    #[test]
    fn test_retain_within_counts_dropped() {
        let mut grid: GridState = [
            PlacedComponent::new("tee", 1, 1, Rotation::R0),
            PlacedComponent::new("tee", 25, 1, Rotation::R0),
            PlacedComponent::new("tee", 1, 30, Rotation::R0),
        ]
        .into_iter()
        .collect();
        assert_eq!(grid.retain_within(GridBounds::default()), 2);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_placed_component_json_shape() {
        let placed = PlacedComponent::new("label", 2, 3, Rotation::R180).with_text("Bed A");
        let json = serde_json::to_value(&placed).expect("serialize"); // test: infallible
        assert_eq!(
            json,
            serde_json::json!({"componentId": "label", "x": 2, "y": 3, "rotation": 180, "text": "Bed A"})
        );
    }

    #[test]
    fn test_non_string_text_is_ignored() {
        let placed: PlacedComponent = serde_json::from_str(
            r#"{"componentId":"label","x":0,"y":0,"rotation":0,"text":42}"#,
        )
        .expect("entry still valid"); // test: known-good input
        assert_eq!(placed.text, None);
    }
}

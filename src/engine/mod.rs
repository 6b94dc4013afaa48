//! Pure grid operations over snapshots.
//!
//! Every mutation borrows the current [`GridState`] and either returns a new
//! snapshot or a [`Rejection`] explaining why nothing changed. The input is
//! never touched.
//!
//! # Operations
//!
//! | Operation           | Rejected when |
//! |---------------------|---------------|
//! | `place`             | out of bounds, occupied, unknown component |
//! | `remove`            | cell empty |
//! | `rotate`            | cell empty |
//! | `move_components`   | any destination out of bounds or hitting a non-moving component |
//! | `remove_components` | none of the cells are occupied |
//! | `rotate_components` | none of the cells are occupied |
//!
//! Batch operations are all-or-nothing.

pub mod connectivity;
pub mod geometry;
pub mod grid;

use crate::catalog::Catalog;
use crate::types::Rotation;
use grid::{CellKey, GridBounds, GridState, PlacedComponent};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

pub use connectivity::{Connection, ConnectionEnd, ValidConnectionTarget};

/// Why an engine operation left the grid unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },

    #[error("cell ({x}, {y}) is already occupied")]
    Occupied { x: i32, y: i32 },

    #[error("unknown component '{0}'")]
    UnknownComponent(String),

    #[error("cell ({x}, {y}) is empty")]
    EmptyCell { x: i32, y: i32 },

    #[error("moving onto ({x}, {y}) would collide with another component")]
    Collision { x: i32, y: i32 },

    #[error("none of the selected cells hold a component")]
    NothingSelected,
}

/// Result of an engine mutation
pub type EngineResult = Result<GridState, Rejection>;

/// Grid engine bound to a catalog and a grid extent.
///
/// Cheap to clone; holds no grid state of its own.
#[derive(Debug, Clone)]
pub struct GridEngine {
    catalog: Arc<Catalog>,
    bounds: GridBounds,
}

impl GridEngine {
    pub fn new(catalog: Arc<Catalog>, bounds: GridBounds) -> Self {
        Self { catalog, bounds }
    }

    /// Engine over the built-in catalog and the default 20×20 grid
    pub fn with_builtin_catalog() -> Self {
        Self::new(Arc::new(Catalog::builtin()), GridBounds::default())
    }

    /// Same catalog over a different grid extent
    pub fn with_bounds(&self, bounds: GridBounds) -> Self {
        Self::new(Arc::clone(&self.catalog), bounds)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    fn check_bounds(&self, x: i32, y: i32) -> Result<(), Rejection> {
        if self.bounds.contains(x, y) {
            Ok(())
        } else {
            Err(Rejection::OutOfBounds { x, y })
        }
    }

    /// Place a component at `(x, y)`. `text` is attached only when given.
    pub fn place(
        &self,
        grid: &GridState,
        component_id: &str,
        x: i32,
        y: i32,
        rotation: Rotation,
        text: Option<&str>,
    ) -> EngineResult {
        self.check_bounds(x, y)?;
        if grid.is_occupied(x, y) {
            return Err(Rejection::Occupied { x, y });
        }
        if !self.catalog.contains(component_id) {
            return Err(Rejection::UnknownComponent(component_id.to_string()));
        }

        let mut placed = PlacedComponent::new(component_id, x, y, rotation);
        placed.text = text.map(str::to_string);

        let mut next = grid.clone();
        next.insert(placed);
        debug!("placed {} at ({}, {}) rotation {}", component_id, x, y, rotation);
        Ok(next)
    }

    /// Remove the component at `(x, y)`
    pub fn remove(&self, grid: &GridState, x: i32, y: i32) -> EngineResult {
        let mut next = grid.clone();
        next.remove_cell(CellKey::new(x, y))
            .ok_or(Rejection::EmptyCell { x, y })?;
        debug!("removed component at ({}, {})", x, y);
        Ok(next)
    }

    /// Advance the rotation at `(x, y)` by a quarter turn clockwise
    pub fn rotate(&self, grid: &GridState, x: i32, y: i32) -> EngineResult {
        let mut next = grid.clone();
        let placed = next
            .get_mut(CellKey::new(x, y))
            .ok_or(Rejection::EmptyCell { x, y })?;
        placed.rotation = placed.rotation.next();
        debug!("rotated ({}, {}) to {}", x, y, placed.rotation);
        Ok(next)
    }

    /// Translate every component in `cells` by `(dx, dy)` at once.
    ///
    /// Cells with nothing in them are ignored. The whole batch is rejected if
    /// any destination is out of bounds or lands on a component that is not
    /// itself moving.
    pub fn move_components(&self, grid: &GridState, cells: &[CellKey], dx: i32, dy: i32) -> EngineResult {
        let moving: BTreeSet<CellKey> = cells
            .iter()
            .copied()
            .filter(|key| grid.is_occupied(key.x, key.y))
            .collect();
        if moving.is_empty() {
            return Err(Rejection::NothingSelected);
        }

        for key in &moving {
            let (tx, ty) = match (key.x.checked_add(dx), key.y.checked_add(dy)) {
                (Some(tx), Some(ty)) => (tx, ty),
                _ => {
                    return Err(Rejection::OutOfBounds {
                        x: key.x.saturating_add(dx),
                        y: key.y.saturating_add(dy),
                    });
                }
            };
            self.check_bounds(tx, ty)?;
            let target = CellKey::new(tx, ty);
            if grid.is_occupied(tx, ty) && !moving.contains(&target) {
                trace!("move blocked: {} -> {} is occupied", key, target);
                return Err(Rejection::Collision { x: tx, y: ty });
            }
        }

        let mut next = grid.clone();
        let lifted: Vec<PlacedComponent> = moving
            .iter()
            .filter_map(|key| next.remove_cell(*key))
            .collect();
        for mut placed in lifted {
            placed.x += dx;
            placed.y += dy;
            next.insert(placed);
        }
        debug!("moved {} component(s) by ({}, {})", moving.len(), dx, dy);
        Ok(next)
    }

    /// Remove every occupied cell in `cells`; empty cells are ignored
    pub fn remove_components(&self, grid: &GridState, cells: &[CellKey]) -> EngineResult {
        let mut next = grid.clone();
        let removed = cells
            .iter()
            .filter(|key| next.remove_cell(**key).is_some())
            .count();
        if removed == 0 {
            return Err(Rejection::NothingSelected);
        }
        debug!("removed {} component(s)", removed);
        Ok(next)
    }

    /// Rotate every occupied cell in `cells` a quarter turn; empty cells are ignored
    pub fn rotate_components(&self, grid: &GridState, cells: &[CellKey]) -> EngineResult {
        let unique: BTreeSet<CellKey> = cells.iter().copied().collect();
        let mut next = grid.clone();
        let mut rotated = 0;
        for key in unique {
            if let Some(placed) = next.get_mut(key) {
                placed.rotation = placed.rotation.next();
                rotated += 1;
            }
        }
        if rotated == 0 {
            return Err(Rejection::NothingSelected);
        }
        debug!("rotated {} component(s)", rotated);
        Ok(next)
    }

    /// Every connection in `grid`, see [`connectivity::connections`]
    pub fn connections(&self, grid: &GridState) -> Vec<Connection> {
        connectivity::connections(&self.catalog, self.bounds, grid)
    }

    /// Connections with an end at `(x, y)`
    pub fn connections_at(&self, grid: &GridState, x: i32, y: i32) -> Vec<Connection> {
        connectivity::connections_at(&self.catalog, self.bounds, grid, x, y)
    }

    /// Ports on neighbors that the component at `(x, y)` mates with
    pub fn valid_connection_targets(
        &self,
        grid: &GridState,
        x: i32,
        y: i32,
        port_id: Option<&str>,
    ) -> Vec<ValidConnectionTarget> {
        connectivity::valid_connection_targets(&self.catalog, self.bounds, grid, x, y, port_id)
    }
}

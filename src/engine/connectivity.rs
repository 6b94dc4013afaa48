//! Connectivity derivation
//!
//! Connections are never stored. They are recomputed from a snapshot: two
//! ports connect when they sit in edge-adjacent cells, face each other after
//! rotation, and have compatible types. Connectivity is purely local, so one
//! pass over every (component, port) pair with O(1) neighbor lookups is enough.
//!
//! Cells outside the grid bounds never take part, even if a snapshot built by
//! hand holds a component there.

use super::geometry::{adjacent_cell, ports_compatible, world_direction};
use super::grid::{GridBounds, GridState, PlacedComponent};
use crate::catalog::{Catalog, Port};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One side of a connection: a specific port on a specific placed component
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEnd {
    pub x: i32,
    pub y: i32,
    pub port_id: String,
}

impl ConnectionEnd {
    pub fn new(x: i32, y: i32, port_id: impl Into<String>) -> Self {
        Self {
            x,
            y,
            port_id: port_id.into(),
        }
    }
}

impl fmt::Display for ConnectionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}):{}", self.x, self.y, self.port_id)
    }
}

/// A neighbor port the queried component can mate with
pub type ValidConnectionTarget = ConnectionEnd;

/// Undirected link between two ports, stored with `from < to`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub from: ConnectionEnd,
    pub to: ConnectionEnd,
}

impl Connection {
    /// Build a connection in canonical endpoint order
    pub fn new(a: ConnectionEnd, b: ConnectionEnd) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }

    /// True if either end sits at `(x, y)`
    pub fn touches(&self, x: i32, y: i32) -> bool {
        (self.from.x == x && self.from.y == y) || (self.to.x == x && self.to.y == y)
    }

    /// True if this links exactly the ends `a` and `b`, in either order
    pub fn links(&self, a: &ConnectionEnd, b: &ConnectionEnd) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.from, self.to)
    }
}

/// The neighbor port facing `port` across the shared edge, if it mates.
fn mating_port<'c>(
    catalog: &'c Catalog,
    bounds: GridBounds,
    grid: &GridState,
    placed: &PlacedComponent,
    port: &Port,
) -> Option<(i32, i32, &'c Port)> {
    let dir = world_direction(port, placed.rotation);
    let (nx, ny) = adjacent_cell(placed.x, placed.y, dir)?;
    if !bounds.contains(nx, ny) {
        return None;
    }
    let neighbor = grid.get(nx, ny)?;
    let neighbor_def = catalog.get(&neighbor.component_id)?;
    let facing = dir.opposite();
    neighbor_def
        .ports
        .iter()
        .find(|other| {
            world_direction(other, neighbor.rotation) == facing
                && ports_compatible(port.port_type, other.port_type)
        })
        .map(|other| (nx, ny, other))
}

/// Every connection in `grid`, each unordered pair exactly once.
///
/// Cells whose component id is missing from the catalog are skipped.
pub fn connections(catalog: &Catalog, bounds: GridBounds, grid: &GridState) -> Vec<Connection> {
    let mut found = BTreeSet::new();
    for placed in grid.iter().filter(|p| bounds.contains(p.x, p.y)) {
        let Some(def) = catalog.get(&placed.component_id) else {
            continue;
        };
        for port in &def.ports {
            if let Some((nx, ny, other)) = mating_port(catalog, bounds, grid, placed, port) {
                found.insert(Connection::new(
                    ConnectionEnd::new(placed.x, placed.y, port.id.as_str()),
                    ConnectionEnd::new(nx, ny, other.id.as_str()),
                ));
            }
        }
    }
    found.into_iter().collect()
}

/// Connections with an end at `(x, y)`
pub fn connections_at(
    catalog: &Catalog,
    bounds: GridBounds,
    grid: &GridState,
    x: i32,
    y: i32,
) -> Vec<Connection> {
    connections(catalog, bounds, grid)
        .into_iter()
        .filter(|c| c.touches(x, y))
        .collect()
}

/// Neighbor ports the component at `(x, y)` connects to.
///
/// With `port_id` only that port is examined (an unknown id yields nothing).
/// Returns an empty list for an empty cell or an unknown component.
pub fn valid_connection_targets(
    catalog: &Catalog,
    bounds: GridBounds,
    grid: &GridState,
    x: i32,
    y: i32,
    port_id: Option<&str>,
) -> Vec<ValidConnectionTarget> {
    if !bounds.contains(x, y) {
        return Vec::new();
    }
    let Some(placed) = grid.get(x, y) else {
        return Vec::new();
    };
    let Some(def) = catalog.get(&placed.component_id) else {
        return Vec::new();
    };

    def.ports
        .iter()
        .filter(|port| port_id.is_none_or(|id| port.id == id))
        .filter_map(|port| mating_port(catalog, bounds, grid, placed, port))
        .map(|(nx, ny, other)| ConnectionEnd::new(nx, ny, other.id.as_str()))
        .collect()
}

//! Property-based tests for dripgrid
//!
//! These tests verify:
//! - Enum string round-trips (parse → to_string → parse)
//! - Rotation algebra and direction mapping
//! - Port compatibility symmetry
//! - Connections are symmetric, unique and agree with valid targets
//! - Batch moves are all-or-nothing

use proptest::prelude::*;
use strum::IntoEnumIterator;

use dripgrid::{
    Catalog, CellKey, ConnectionEnd, Direction, GridEngine, GridState, PortType, Rejection, Rotation,
    adjacent_cell, ports_compatible, rotate_direction, rotate_direction_by_degrees,
};

// =============================================================================
// Strategies
// =============================================================================

fn port_type_strategy() -> impl Strategy<Value = PortType> {
    prop_oneof![
        Just(PortType::Slip),
        Just(PortType::MaleThread),
        Just(PortType::FemaleThread),
        Just(PortType::Barb),
    ]
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::North),
        Just(Direction::East),
        Just(Direction::South),
        Just(Direction::West),
    ]
}

fn rotation_strategy() -> impl Strategy<Value = Rotation> {
    prop_oneof![
        Just(Rotation::R0),
        Just(Rotation::R90),
        Just(Rotation::R180),
        Just(Rotation::R270),
    ]
}

/// Any catalog component id, labels included
fn component_id_strategy() -> impl Strategy<Value = String> {
    let ids: Vec<String> = Catalog::global().iter().map(|c| c.id.clone()).collect();
    proptest::sample::select(ids)
}

/// A random layout on a small corner of the 20×20 grid so neighbors are likely
fn grid_strategy() -> impl Strategy<Value = GridState> {
    prop::collection::vec(
        (component_id_strategy(), 0..8i32, 0..8i32, rotation_strategy()),
        0..40,
    )
    .prop_map(|entries| {
        let engine = GridEngine::with_builtin_catalog();
        entries
            .into_iter()
            .fold(GridState::new(), |grid, (id, x, y, rotation)| {
                engine.place(&grid, &id, x, y, rotation, None).unwrap_or(grid)
            })
    })
}

// =============================================================================
// Enum round-trips
// =============================================================================

proptest! {
    /// PortType: to_string → parse round-trip is identity
    #[test]
    fn port_type_roundtrip(port_type in port_type_strategy()) {
        let s = port_type.to_string();
        let parsed: PortType = s.parse().expect("Should parse");
        prop_assert_eq!(port_type, parsed);
        prop_assert_eq!(s.clone(), s.to_lowercase());
    }

    /// Direction: to_string → parse round-trip is identity
    #[test]
    fn direction_roundtrip(direction in direction_strategy()) {
        let parsed: Direction = direction.to_string().parse().expect("Should parse");
        prop_assert_eq!(direction, parsed);
    }

    /// Rotation: degrees → from_degrees round-trip is identity
    #[test]
    fn rotation_degrees_roundtrip(rotation in rotation_strategy()) {
        prop_assert_eq!(Rotation::from_degrees(i64::from(rotation.degrees())), Some(rotation));
    }

    /// Only the four quarter turns are accepted as rotations
    #[test]
    fn rotation_rejects_other_degrees(degrees in -1000i64..1000) {
        let expected = matches!(degrees, 0 | 90 | 180 | 270);
        prop_assert_eq!(Rotation::from_degrees(degrees).is_some(), expected);
        prop_assert_eq!(Rotation::try_from(degrees).is_ok(), expected);
    }
}

// =============================================================================
// Geometry
// =============================================================================

proptest! {
    /// Four quarter turns bring every rotation back to itself
    #[test]
    fn rotation_next_cycles(rotation in rotation_strategy()) {
        let back = rotation.next().next().next().next();
        prop_assert_eq!(back, rotation);
    }

    /// Rotating by r then by inverse(r) is the identity on directions
    #[test]
    fn rotation_inverse_undoes(direction in direction_strategy(), rotation in rotation_strategy()) {
        let there = rotate_direction(direction, rotation);
        prop_assert_eq!(rotate_direction(there, rotation.inverse()), direction);
    }

    /// Degree-based rotation agrees with the enum for any whole number of turns
    #[test]
    fn rotation_by_degrees_matches_enum(
        direction in direction_strategy(),
        rotation in rotation_strategy(),
        extra_turns in -5i32..5,
    ) {
        let degrees = i32::from(rotation.degrees()) + 360 * extra_turns;
        prop_assert_eq!(
            rotate_direction_by_degrees(direction, degrees),
            rotate_direction(direction, rotation)
        );
    }

    /// Stepping out and back across opposite directions returns to the start
    #[test]
    fn adjacent_cell_opposite_returns(x in -50i32..50, y in -50i32..50, direction in direction_strategy()) {
        let (nx, ny) = adjacent_cell(x, y, direction).expect("far from i32 limits");
        prop_assert_eq!(adjacent_cell(nx, ny, direction.opposite()), Some((x, y)));
        prop_assert_eq!((nx - x).abs() + (ny - y).abs(), 1);
    }

    /// Compatibility does not depend on argument order
    #[test]
    fn compatibility_is_symmetric(a in port_type_strategy(), b in port_type_strategy()) {
        prop_assert_eq!(ports_compatible(a, b), ports_compatible(b, a));
    }
}

#[test]
fn every_port_type_mates_with_itself() {
    for port_type in PortType::iter() {
        assert!(ports_compatible(port_type, port_type), "{}", port_type);
    }
}

// =============================================================================
// Connectivity
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Each connection appears once, in canonical order, between adjacent cells
    #[test]
    fn connections_are_unique_and_adjacent(grid in grid_strategy()) {
        let engine = GridEngine::with_builtin_catalog();
        let conns = engine.connections(&grid);

        let mut sorted = conns.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), conns.len());

        for c in &conns {
            prop_assert!(c.from < c.to);
            prop_assert_eq!((c.from.x - c.to.x).abs() + (c.from.y - c.to.y).abs(), 1);
        }
    }

    /// Every connection is seen as a valid target from both of its ends
    #[test]
    fn connections_agree_with_targets(grid in grid_strategy()) {
        let engine = GridEngine::with_builtin_catalog();
        for c in engine.connections(&grid) {
            let from_side = engine.valid_connection_targets(&grid, c.from.x, c.from.y, Some(c.from.port_id.as_str()));
            prop_assert!(from_side.contains(&c.to));
            let to_side = engine.valid_connection_targets(&grid, c.to.x, c.to.y, Some(c.to.port_id.as_str()));
            prop_assert!(to_side.contains(&c.from));
        }
    }

    /// Every valid target corresponds to a derived connection
    #[test]
    fn targets_imply_connections(grid in grid_strategy()) {
        let engine = GridEngine::with_builtin_catalog();
        let conns = engine.connections(&grid);
        for key in grid.keys() {
            let Some(placed) = grid.get(key.x, key.y) else { continue };
            let Some(def) = engine.catalog().get(&placed.component_id) else { continue };
            for port in &def.ports {
                let here = ConnectionEnd::new(key.x, key.y, port.id.as_str());
                for target in engine.valid_connection_targets(&grid, key.x, key.y, Some(port.id.as_str())) {
                    prop_assert!(conns.iter().any(|c| c.links(&here, &target)));
                }
            }
        }
    }

    /// Connectivity is a function of the snapshot alone
    #[test]
    fn connections_are_deterministic(grid in grid_strategy()) {
        let engine = GridEngine::with_builtin_catalog();
        prop_assert_eq!(engine.connections(&grid), engine.connections(&grid.clone()));
    }
}

// =============================================================================
// Mutations
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A move either relocates every selected component or changes nothing
    #[test]
    fn move_is_all_or_nothing(grid in grid_strategy(), dx in -3i32..4, dy in -3i32..4, take in 1usize..6) {
        let engine = GridEngine::with_builtin_catalog();
        let cells: Vec<CellKey> = grid.keys().take(take).collect();
        match engine.move_components(&grid, &cells, dx, dy) {
            Ok(moved) => {
                prop_assert_eq!(moved.len(), grid.len());
                for key in &cells {
                    let before = grid.get(key.x, key.y).expect("selected from occupied keys");
                    let after = moved.get(key.x + dx, key.y + dy).expect("component moved");
                    prop_assert_eq!(&after.component_id, &before.component_id);
                    prop_assert_eq!(after.rotation, before.rotation);
                    prop_assert_eq!((after.x, after.y), (key.x + dx, key.y + dy));
                }
            }
            Err(rejection) => {
                let expected_kind = matches!(
                    rejection,
                    Rejection::OutOfBounds { .. } | Rejection::Collision { .. } | Rejection::NothingSelected
                );
                prop_assert!(expected_kind);
            }
        }
    }

    /// Placing on an occupied cell is always rejected with the snapshot intact
    #[test]
    fn place_on_occupied_is_rejected(grid in grid_strategy(), id in component_id_strategy()) {
        let engine = GridEngine::with_builtin_catalog();
        let before = grid.clone();
        for key in grid.keys() {
            let result = engine.place(&grid, &id, key.x, key.y, Rotation::R0, None);
            prop_assert_eq!(result, Err(Rejection::Occupied { x: key.x, y: key.y }));
        }
        prop_assert_eq!(grid, before);
    }

    /// Batch rotation equals rotating each cell on its own
    #[test]
    fn batch_rotate_matches_single_rotate(grid in grid_strategy()) {
        prop_assume!(!grid.is_empty());
        let engine = GridEngine::with_builtin_catalog();
        let cells: Vec<CellKey> = grid.keys().collect();
        let batch = engine.rotate_components(&grid, &cells).expect("grid is non-empty");
        let single = cells.iter().fold(grid.clone(), |g, key| {
            engine.rotate(&g, key.x, key.y).expect("cell occupied")
        });
        prop_assert_eq!(batch, single);
    }
}

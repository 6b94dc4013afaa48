//! Geometry primitives: rotating directions, stepping to neighbor cells and
//! deciding whether two port types mate.

use crate::catalog::Port;
use crate::types::{Direction, PortType, Rotation};

/// Map a nominal direction to its world direction under `rotation`.
#[inline]
pub fn rotate_direction(direction: Direction, rotation: Rotation) -> Direction {
    Direction::CLOCKWISE[(direction.index() + rotation.quarter_turns()) % 4]
}

/// Rotate by an arbitrary multiple of 90 degrees, positive or negative.
///
/// Degrees that are not a multiple of 90 are truncated toward zero quarter turns.
pub fn rotate_direction_by_degrees(direction: Direction, degrees: i32) -> Direction {
    let steps = (direction.index() as i32 + degrees / 90).rem_euclid(4);
    Direction::CLOCKWISE[steps as usize]
}

/// Direction a port faces once its component is rotated
#[inline]
pub fn world_direction(port: &Port, rotation: Rotation) -> Direction {
    rotate_direction(port.direction, rotation)
}

/// Cell one step away in `direction`. No bounds clamping; `None` only when
/// the step would overflow `i32`.
#[inline]
pub const fn adjacent_cell(x: i32, y: i32, direction: Direction) -> Option<(i32, i32)> {
    match direction {
        Direction::North => match y.checked_sub(1) {
            Some(ny) => Some((x, ny)),
            None => None,
        },
        Direction::South => match y.checked_add(1) {
            Some(ny) => Some((x, ny)),
            None => None,
        },
        Direction::East => match x.checked_add(1) {
            Some(nx) => Some((nx, y)),
            None => None,
        },
        Direction::West => match x.checked_sub(1) {
            Some(nx) => Some((nx, y)),
            None => None,
        },
    }
}

/// Symmetric mating rule between two facing ports.
///
/// Identical types mate, as do male/female threads and barb/slip.
pub const fn ports_compatible(a: PortType, b: PortType) -> bool {
    use PortType::{Barb, FemaleThread, MaleThread, Slip};
    matches!(
        (a, b),
        (Slip, Slip)
            | (Barb, Barb)
            | (MaleThread, MaleThread)
            | (FemaleThread, FemaleThread)
            | (MaleThread, FemaleThread)
            | (FemaleThread, MaleThread)
            | (Barb, Slip)
            | (Slip, Barb)
    )
}

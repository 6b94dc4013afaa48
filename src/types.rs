//! Type-safe vocabulary for the irrigation grid
//!
//! Port types, directions, rotations and component categories are closed sets,
//! so they are enums rather than strings. The serialized spellings match the
//! exchange document format (`"male_thread"`, `"north"`, `90`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Physical connection style of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PortType {
    Slip,
    MaleThread,
    FemaleThread,
    Barb,
}

/// Cardinal direction on the grid (north is toward y = 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Clockwise cyclic order used for rotation arithmetic
    pub const CLOCKWISE: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Position of this direction in [`Direction::CLOCKWISE`]
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Direction facing the other way across a cell edge
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

/// Clockwise rotation of a placed component, in 90 degree steps.
///
/// Serialized as the integer number of degrees. Any other value is refused,
/// which is what lets the document importer drop entries such as `rotation: 45`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(EnumIter)]
#[serde(try_from = "i64", into = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Rotation in degrees (0, 90, 180 or 270)
    pub const fn degrees(self) -> u16 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }

    /// Number of quarter turns clockwise
    pub const fn quarter_turns(self) -> usize {
        self.degrees() as usize / 90
    }

    /// Parse an exact degree value; anything outside {0, 90, 180, 270} is `None`
    pub const fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees {
            0 => Some(Self::R0),
            90 => Some(Self::R90),
            180 => Some(Self::R180),
            270 => Some(Self::R270),
            _ => None,
        }
    }

    /// Next rotation in the cycle 0 → 90 → 180 → 270 → 0
    pub const fn next(self) -> Self {
        match self {
            Self::R0 => Self::R90,
            Self::R90 => Self::R180,
            Self::R180 => Self::R270,
            Self::R270 => Self::R0,
        }
    }

    /// Rotation that undoes this one, i.e. `(360 - degrees) mod 360`
    pub const fn inverse(self) -> Self {
        match self {
            Self::R0 => Self::R0,
            Self::R90 => Self::R270,
            Self::R180 => Self::R180,
            Self::R270 => Self::R90,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Error returned when a degree value is not one of the four allowed rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rotation must be 0, 90, 180 or 270 degrees, got {0}")]
pub struct InvalidRotation(pub i64);

impl TryFrom<i64> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: i64) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees).ok_or(InvalidRotation(degrees))
    }
}

/// Catalog grouping of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComponentCategory {
    Fitting,
    Connector,
    Emitter,
}

//! Side tags for the faces of a hexahedral cell.
//!
//! Faces of a cell in a structured (corner-point or Cartesian) grid carry a
//! tag telling which side of the cell they bound. The integer encoding is
//! `2 * dimension + direction`:
//!
//! | tag | side  | dimension | direction  |
//! |-----|-------|-----------|------------|
//! | 0   | West  | X         | Decreasing |
//! | 1   | East  | X         | Increasing |
//! | 2   | South | Y         | Decreasing |
//! | 3   | North | Y         | Increasing |
//! | 4   | Up    | Z         | Decreasing |
//! | 5   | Down  | Z         | Increasing |
//!
//! Depth (z) grows downwards, so the `Up` face has the smaller z.

use std::fmt;

/// Coordinate axis of a 3D grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dim3D {
    X,
    Y,
    Z,
}

impl Dim3D {
    /// Component index into an `[x, y, z]` coordinate.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Dim3D::X => 0,
            Dim3D::Y => 1,
            Dim3D::Z => 2,
        }
    }
}

/// Direction along an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Decreasing,
    Increasing,
}

/// Tag identifying which side of a cell a face lies on.
///
/// # Example
///
/// ```
/// use verteq::types::{Dim3D, Dir, Side3D};
///
/// assert_eq!(Side3D::Up.dim(), Dim3D::Z);
/// assert_eq!(Side3D::Down.dir(), Dir::Increasing);
/// assert_eq!(Side3D::from_tag(5), Some(Side3D::Down));
/// assert_eq!(Side3D::Up.opposite(), Side3D::Down);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side3D {
    West,
    East,
    South,
    North,
    Up,
    Down,
}

impl Side3D {
    /// All sides in tag order.
    pub const ALL: [Side3D; 6] = [
        Side3D::West,
        Side3D::East,
        Side3D::South,
        Side3D::North,
        Side3D::Up,
        Side3D::Down,
    ];

    /// Build a side from its axis and direction.
    pub const fn new(dim: Dim3D, dir: Dir) -> Self {
        match (dim, dir) {
            (Dim3D::X, Dir::Decreasing) => Side3D::West,
            (Dim3D::X, Dir::Increasing) => Side3D::East,
            (Dim3D::Y, Dir::Decreasing) => Side3D::South,
            (Dim3D::Y, Dir::Increasing) => Side3D::North,
            (Dim3D::Z, Dir::Decreasing) => Side3D::Up,
            (Dim3D::Z, Dir::Increasing) => Side3D::Down,
        }
    }

    /// Decode an integer face tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Integer face tag, `2 * dim + dir`.
    #[inline]
    pub const fn tag(self) -> u8 {
        let dir = match self.dir() {
            Dir::Decreasing => 0,
            Dir::Increasing => 1,
        };
        2 * self.dim().index() as u8 + dir
    }

    /// Axis the face is normal to.
    #[inline]
    pub const fn dim(self) -> Dim3D {
        match self {
            Side3D::West | Side3D::East => Dim3D::X,
            Side3D::South | Side3D::North => Dim3D::Y,
            Side3D::Up | Side3D::Down => Dim3D::Z,
        }
    }

    /// Direction of the outward normal along the axis.
    #[inline]
    pub const fn dir(self) -> Dir {
        match self {
            Side3D::West | Side3D::South | Side3D::Up => Dir::Decreasing,
            Side3D::East | Side3D::North | Side3D::Down => Dir::Increasing,
        }
    }

    /// Side on the other end of the same axis.
    pub const fn opposite(self) -> Self {
        match self {
            Side3D::West => Side3D::East,
            Side3D::East => Side3D::West,
            Side3D::South => Side3D::North,
            Side3D::North => Side3D::South,
            Side3D::Up => Side3D::Down,
            Side3D::Down => Side3D::Up,
        }
    }
}

impl fmt::Display for Side3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side3D::West => "west",
            Side3D::East => "east",
            Side3D::South => "south",
            Side3D::North => "north",
            Side3D::Up => "up",
            Side3D::Down => "down",
        };
        f.write_str(name)
    }
}

impl From<Side3D> for u8 {
    fn from(side: Side3D) -> u8 {
        side.tag()
    }
}

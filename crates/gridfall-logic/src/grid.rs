//! Map positions, Manhattan distance, and cell addressing.
//!
//! The overworld is a fixed 128×128 grid. Cells are addressed as
//! `row * 128 + col`, the only addressing scheme the core defines.
//! [`Position`] is also reused for the 5×5 combat grid, whose bounds
//! are checked by the combat engine itself.

use serde::{Deserialize, Serialize};

/// Side length of the square overworld map.
pub const MAP_SIZE: i32 = 128;

/// A (row, col) cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another position.
    pub fn manhattan(&self, other: &Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Linear cell address (`row * 128 + col`). Only meaningful for
    /// in-bounds overworld positions.
    pub fn address(&self) -> u32 {
        (self.row * MAP_SIZE + self.col) as u32
    }

    /// Inverse of [`Position::address`].
    pub fn from_address(address: u32) -> Self {
        Self {
            row: address as i32 / MAP_SIZE,
            col: address as i32 % MAP_SIZE,
        }
    }

    /// Whether this position lies on the overworld map.
    pub fn in_map_bounds(&self) -> bool {
        self.row >= 0 && self.row < MAP_SIZE && self.col >= 0 && self.col < MAP_SIZE
    }

    /// One-step neighbor in the given direction.
    pub fn step(&self, dir: Direction) -> Position {
        let (dr, dc) = dir.delta();
        Position::new(self.row + dr, self.col + dc)
    }
}

/// A single-tile movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// (row, col) delta for one step. North decreases the row.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance() {
        let a = Position::new(2, 3);
        let b = Position::new(5, 1);
        assert_eq!(a.manhattan(&b), 5);
        assert_eq!(b.manhattan(&a), 5);
        assert_eq!(a.manhattan(&a), 0);
    }

    #[test]
    fn address_round_trip() {
        let p = Position::new(110, 37);
        assert_eq!(p.address(), 110 * 128 + 37);
        assert_eq!(Position::from_address(p.address()), p);
    }

    #[test]
    fn bounds() {
        assert!(Position::new(0, 0).in_map_bounds());
        assert!(Position::new(127, 127).in_map_bounds());
        assert!(!Position::new(128, 0).in_map_bounds());
        assert!(!Position::new(-1, 5).in_map_bounds());
    }

    #[test]
    fn step_directions() {
        let p = Position::new(10, 10);
        assert_eq!(p.step(Direction::North), Position::new(9, 10));
        assert_eq!(p.step(Direction::South), Position::new(11, 10));
        assert_eq!(p.step(Direction::East), Position::new(10, 11));
        assert_eq!(p.step(Direction::West), Position::new(10, 9));
    }
}

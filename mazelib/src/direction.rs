use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The four cardinal directions, in screen coordinates: north is y-1,
/// south is y+1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction {0:?}, expected up, right, down or left")]
pub struct ParseDirectionError(String);

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Index into direction-keyed arrays such as `Room`'s wall and link sets.
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// The names used on the wire: `/move/up` and friends.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "up",
            Direction::East => "right",
            Direction::South => "down",
            Direction::West => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::North),
            "right" => Ok(Direction::East),
            "down" => Ok(Direction::South),
            "left" => Ok(Direction::West),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_are_involutions() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn wire_names_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(dir.as_str().parse::<Direction>().unwrap(), dir);
        }
        assert!("north".parse::<Direction>().is_err());
    }

    #[test]
    fn deltas_cancel_with_opposites() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }
}

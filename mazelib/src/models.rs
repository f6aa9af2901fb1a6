use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// A location in the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    pub fn new(x: usize, y: usize) -> Self {
        Coordinate { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Wall state of a single room as seen from inside it.
/// `true` indicates a wall is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Survey {
    pub const SEALED: Survey = Survey {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub fn wall(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.top,
            Direction::East => self.right,
            Direction::South => self.bottom,
            Direction::West => self.left,
        }
    }

    pub fn set_wall(&mut self, dir: Direction, present: bool) {
        match dir {
            Direction::North => self.top = present,
            Direction::East => self.right = present,
            Direction::South => self.bottom = present,
            Direction::West => self.left = present,
        }
    }

    pub fn open_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| !self.wall(*dir))
            .collect()
    }
}

/// The JSON object daedalus sends back for every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub survey: Survey,
    #[serde(default)]
    pub victory: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: bool,
}

impl Reply {
    pub fn with_survey(survey: Survey) -> Self {
        Reply {
            survey,
            ..Reply::default()
        }
    }

    pub fn victorious(message: impl Into<String>) -> Self {
        Reply {
            victory: true,
            message: message.into(),
            ..Reply::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Reply {
            error: true,
            message: message.into(),
            ..Reply::default()
        }
    }
}

/// Aggregate results across every maze solved in this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub sessions_solved: usize,
    pub average_steps: u32,
}

/// Mean steps-to-victory, zero when nothing has been solved yet.
pub fn average(scores: &[u32]) -> u32 {
    if scores.is_empty() {
        return 0;
    }
    scores.iter().sum::<u32>() / scores.len() as u32
}

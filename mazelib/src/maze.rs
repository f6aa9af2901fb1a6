use crate::direction::Direction;
use crate::error::MazeError;
use crate::grid::{Grid, Room};
use crate::models::{Coordinate, Survey};

/// What the agent sees when it looks around its current room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Look {
    /// The agent is standing on the treasure.
    Victory,
    Survey(Survey),
}

/// Outcome of a successful move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The agent reached (or was already at) the treasure.
    Victory,
    /// The agent moved; this is the survey of the room it arrived in.
    Moved(Survey),
}

/// Aggregate root for one maze being played: the grid plus the start, the
/// treasure, the agent's position and its step counter. The move operations
/// below are the only mutators of agent state, so `steps_taken` always
/// equals the number of successful moves since construction.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    start: Coordinate,
    treasure: Coordinate,
    position: Coordinate,
    steps_taken: u32,
}

impl Maze {
    /// Wraps a carved grid. The agent awakes at `start`; `start` and
    /// `treasure` are fixed for the life of the maze.
    pub fn new(grid: Grid, start: Coordinate, treasure: Coordinate) -> Self {
        Maze {
            grid,
            start,
            treasure,
            position: start,
            steps_taken: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn treasure(&self) -> Coordinate {
        self.treasure
    }

    /// The agent's current position.
    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    pub fn room(&self, x: i64, y: i64) -> Result<&Room, MazeError> {
        self.grid.room(x, y)
    }

    /// Survey of the room at the given coordinate.
    pub fn discover(&self, x: i64, y: i64) -> Result<Survey, MazeError> {
        self.grid.survey(x, y)
    }

    /// Survey of the agent's room, or `Victory` when it stands on the
    /// treasure.
    pub fn look_around(&self) -> Result<Look, MazeError> {
        if self.position == self.treasure {
            return Ok(Look::Victory);
        }
        let survey = self.discover(self.position.x as i64, self.position.y as i64)?;
        Ok(Look::Survey(survey))
    }

    /// Moves the agent one room over. A wall on that side fails with
    /// `BlockedByWall`, a destination outside the grid with `OutOfBounds`;
    /// failed moves leave position and step counter untouched. Standing on
    /// the treasure short-circuits to `Victory` without moving.
    pub fn move_in(&mut self, dir: Direction) -> Result<MoveResult, MazeError> {
        let survey = match self.look_around()? {
            Look::Victory => return Ok(MoveResult::Victory),
            Look::Survey(survey) => survey,
        };
        if survey.wall(dir) {
            return Err(MazeError::BlockedByWall);
        }

        let (dx, dy) = dir.delta();
        let (x, y) = (self.position.x as i64 + dx, self.position.y as i64 + dy);
        self.grid.room(x, y)?;

        self.position = Coordinate::new(x as usize, y as usize);
        self.steps_taken += 1;

        match self.look_around()? {
            Look::Victory => Ok(MoveResult::Victory),
            Look::Survey(survey) => Ok(MoveResult::Moved(survey)),
        }
    }

    pub fn move_up(&mut self) -> Result<MoveResult, MazeError> {
        self.move_in(Direction::North)
    }

    pub fn move_down(&mut self) -> Result<MoveResult, MazeError> {
        self.move_in(Direction::South)
    }

    pub fn move_left(&mut self) -> Result<MoveResult, MazeError> {
        self.move_in(Direction::West)
    }

    pub fn move_right(&mut self) -> Result<MoveResult, MazeError> {
        self.move_in(Direction::East)
    }
}

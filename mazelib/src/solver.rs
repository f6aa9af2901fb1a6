use rand::seq::SliceRandom;
use rand::Rng;

use crate::direction::Direction;
use crate::error::{MazeError, SolveError};
use crate::maze::{Look, Maze, MoveResult};
use crate::models::Survey;

/// One room on the walker's current path: the survey it observed there and
/// the directions it has already tried from it.
#[derive(Debug, Clone)]
struct Frame {
    survey: Survey,
    tried: [bool; 4],
    /// Direction of the move that entered this room; `None` for the start.
    entered_via: Option<Direction>,
}

impl Frame {
    fn untried_open(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| !self.survey.wall(*dir) && !self.tried[dir.index()])
            .collect()
    }
}

/// Blind depth-first walker. It knows nothing about the maze except the
/// surveys of the rooms it has stood in; the stack, bottom to top, is
/// exactly the path from the start to its current room. When every open
/// direction from the top room has been tried, it retreats the way it came.
///
/// The state machine is transport-free: propose a move with `next_move`,
/// perform it against a maze (in-process or over the wire), then report the
/// outcome with `arrived` or `blocked`.
#[derive(Debug, Clone)]
pub struct Backtracker {
    stack: Vec<Frame>,
    pending: Option<Pending>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Advance(Direction),
    Retreat,
}

impl Backtracker {
    pub fn new(start_survey: Survey) -> Self {
        Backtracker {
            stack: vec![Frame {
                survey: start_survey,
                tried: [false; 4],
                entered_via: None,
            }],
            pending: None,
        }
    }

    /// Rooms on the current path, the start included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Picks the next move: a uniformly random untried open direction from
    /// the current room, or the retreat move out of an exhausted one.
    /// `None` means the whole reachable maze is exhausted and the walker
    /// gives up.
    pub fn next_move<R: Rng>(&mut self, rng: &mut R) -> Option<Direction> {
        let top = self.stack.last_mut()?;
        if let Some(&dir) = top.untried_open().choose(rng) {
            top.tried[dir.index()] = true;
            self.pending = Some(Pending::Advance(dir));
            return Some(dir);
        }

        // Exhausted room: drop it and walk back out the way we came in.
        let frame = self.stack.pop()?;
        let entered_via = frame.entered_via?;
        self.pending = Some(Pending::Retreat);
        Some(entered_via.opposite())
    }

    /// Reports that the proposed move succeeded and what the destination
    /// room looks like. After an advance this pushes a new frame with the
    /// reverse direction pre-marked, so the walker never immediately undoes
    /// a step; after a retreat the parent room is already on top.
    pub fn arrived(&mut self, survey: Survey) {
        if let Some(Pending::Advance(dir)) = self.pending.take() {
            let mut tried = [false; 4];
            tried[dir.opposite().index()] = true;
            self.stack.push(Frame {
                survey,
                tried,
                entered_via: Some(dir),
            });
        }
    }

    /// Reports that the proposed move was rejected. The direction stays
    /// marked as tried so it is never offered again from that room.
    pub fn blocked(&mut self) {
        self.pending = None;
    }
}

/// Runs a blind backtracking walk over `maze` until the treasure is found,
/// returning the maze's step count. `Exhausted` means the walker ran out of
/// rooms, which a connected maze never causes.
pub fn solve<R: Rng>(maze: &mut Maze, rng: &mut R) -> Result<u32, SolveError> {
    let survey = match maze.look_around()? {
        Look::Victory => return Ok(maze.steps_taken()),
        Look::Survey(survey) => survey,
    };

    let mut walker = Backtracker::new(survey);
    loop {
        let Some(dir) = walker.next_move(rng) else {
            return Err(SolveError::Exhausted {
                moves: maze.steps_taken(),
            });
        };
        match maze.move_in(dir) {
            Ok(MoveResult::Victory) => return Ok(maze.steps_taken()),
            Ok(MoveResult::Moved(survey)) => walker.arrived(survey),
            Err(MazeError::BlockedByWall) | Err(MazeError::OutOfBounds { .. }) => {
                walker.blocked();
            }
            Err(err) => return Err(err.into()),
        }
    }
}

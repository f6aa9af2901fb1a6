use thiserror::Error;

use crate::models::Coordinate;

/// Failures of the survey/move contract. Victory is not in here: reaching
/// the treasure is reported through `Look::Victory` / `MoveResult::Victory`
/// so callers can never confuse it with a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("room ({x}, {y}) is outside of the maze boundaries")]
    OutOfBounds { x: i64, y: i64 },

    #[error("can't walk through walls")]
    BlockedByWall,

    #[error("rooms {a} and {b} are not adjacent")]
    NotAdjacent { a: Coordinate, b: Coordinate },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// Fewer than two rooms: there is nowhere to hide the treasure from the
    /// start, so generation refuses instead of retrying forever.
    #[error("a {width}x{height} grid is too small to hold a distinct start and treasure")]
    TooSmall { width: usize, height: usize },

    /// The requested dimensions overflow or exceed `generator::MAX_ROOMS`.
    #[error(
        "a {width}x{height} grid exceeds the supported size of {max} rooms",
        max = crate::generator::MAX_ROOMS
    )]
    TooLarge { width: usize, height: usize },

    #[error("could not place the start and the treasure in distinct rooms")]
    PlacementConflict,

    #[error(transparent)]
    Maze(#[from] MazeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The traversal stack emptied without reaching the treasure. On a
    /// correctly generated maze this indicates a generation bug.
    #[error("every reachable room explored without finding the treasure after {moves} moves")]
    Exhausted { moves: u32 },

    #[error(transparent)]
    Maze(#[from] MazeError),
}

//! Core of the labyrinth game: rectangular grid mazes carved with the
//! recursive backtracker, optional braiding to remove dead ends, the
//! survey/move contract the agent plays through, and a blind backtracking
//! solver that walks a maze knowing nothing but the walls of its current
//! room.
//!
//! The `daedalus` server and the `icarus` client are thin transports around
//! the operations in here.

pub mod direction;
pub mod error;
pub mod generator;
pub mod grid;
pub mod maze;
pub mod models;
mod render;
pub mod session;
pub mod solver;

pub use direction::Direction;
pub use error::{GenerateError, MazeError, SolveError};
pub use generator::Generator;
pub use grid::{Grid, Room};
pub use maze::{Look, Maze, MoveResult};
pub use models::{average, Coordinate, Reply, SessionStats, Survey};
pub use session::{SessionError, SessionMove, SessionRegistry};
pub use solver::{solve, Backtracker};

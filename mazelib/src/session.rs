use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::direction::Direction;
use crate::error::{GenerateError, MazeError};
use crate::generator::Generator;
use crate::maze::{Maze, MoveResult};
use crate::models::{average, SessionStats, Survey};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no such session; call /awake first")]
    NoSession,

    #[error(transparent)]
    Maze(#[from] MazeError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Outcome of a move routed through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMove {
    /// The treasure was reached; the session is over and scored.
    Victory { steps: u32 },
    Moved(Survey),
}

#[derive(Debug)]
struct Session {
    maze: Maze,
}

/// Every live maze plus the scores of the solved ones. One maze per
/// session, one agent per maze; the registry hands out ids so several
/// sessions can run side by side, while `None` falls back to the most
/// recently started one for the classic single-client protocol.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, Session>,
    active: Option<Uuid>,
    scores: Vec<u32>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry::default()
    }

    /// Generates a fresh maze, registers it and returns its id together
    /// with the survey of the room the agent awakes in.
    pub fn start_session<R: Rng>(
        &mut self,
        width: usize,
        height: usize,
        braid: f64,
        rng: &mut R,
    ) -> Result<(Uuid, Survey), SessionError> {
        let maze = Generator::new(width, height).braid(braid).generate(rng)?;
        let start = maze.start();
        let survey = maze.discover(start.x as i64, start.y as i64)?;

        let id = Uuid::new_v4();
        info!(%id, width, height, braid, "session started");
        self.sessions.insert(id, Session { maze });
        self.active = Some(id);
        Ok((id, survey))
    }

    fn resolve(&self, id: Option<Uuid>) -> Result<Uuid, SessionError> {
        id.or(self.active).ok_or(SessionError::NoSession)
    }

    pub fn maze(&self, id: Option<Uuid>) -> Option<&Maze> {
        let id = self.resolve(id).ok()?;
        self.sessions.get(&id).map(|session| &session.maze)
    }

    pub fn discover(&self, id: Option<Uuid>, x: i64, y: i64) -> Result<Survey, SessionError> {
        let id = self.resolve(id)?;
        let session = self.sessions.get(&id).ok_or(SessionError::NoSession)?;
        Ok(session.maze.discover(x, y)?)
    }

    /// Moves the session's agent. Victory scores the session and removes
    /// it: each maze is solved exactly once.
    pub fn move_agent(
        &mut self,
        id: Option<Uuid>,
        dir: Direction,
    ) -> Result<SessionMove, SessionError> {
        let id = self.resolve(id)?;
        let session = self.sessions.get_mut(&id).ok_or(SessionError::NoSession)?;

        match session.maze.move_in(dir)? {
            MoveResult::Moved(survey) => Ok(SessionMove::Moved(survey)),
            MoveResult::Victory => {
                let steps = session.maze.steps_taken();
                info!(%id, steps, "victory");
                self.scores.push(steps);
                self.sessions.remove(&id);
                if self.active == Some(id) {
                    self.active = None;
                }
                Ok(SessionMove::Victory { steps })
            }
        }
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            sessions_solved: self.scores.len(),
            average_steps: average(&self.scores),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Backtracker;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn moves_without_a_session_are_rejected() {
        let mut registry = SessionRegistry::new();
        assert_eq!(
            registry.move_agent(None, Direction::North),
            Err(SessionError::NoSession)
        );
        assert_eq!(
            registry.discover(None, 0, 0),
            Err(SessionError::NoSession)
        );
    }

    #[test]
    fn start_session_surfaces_generation_failures() {
        let mut registry = SessionRegistry::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            registry.start_session(1, 1, 0.0, &mut rng),
            Err(SessionError::Generate(GenerateError::TooSmall { .. }))
        ));
        assert!(matches!(
            registry.start_session(usize::MAX, 2, 0.0, &mut rng),
            Err(SessionError::Generate(GenerateError::TooLarge { .. }))
        ));
    }

    #[test]
    fn a_session_is_played_to_victory_and_scored() {
        let mut registry = SessionRegistry::new();
        let mut rng = StdRng::seed_from_u64(42);
        let (id, survey) = registry.start_session(6, 5, 0.0, &mut rng).unwrap();

        let mut walker = Backtracker::new(survey);
        let steps = loop {
            let dir = walker.next_move(&mut rng).expect("connected maze");
            match registry.move_agent(Some(id), dir) {
                Ok(SessionMove::Victory { steps }) => break steps,
                Ok(SessionMove::Moved(survey)) => walker.arrived(survey),
                Err(SessionError::Maze(_)) => walker.blocked(),
                Err(other) => panic!("unexpected error: {other}"),
            }
        };

        assert!(steps >= 1);
        let stats = registry.stats();
        assert_eq!(stats.sessions_solved, 1);
        assert_eq!(stats.average_steps, steps);
        // solved sessions are gone
        assert_eq!(
            registry.move_agent(Some(id), Direction::North),
            Err(SessionError::NoSession)
        );
    }

    #[test]
    fn bare_moves_target_the_most_recent_session() {
        let mut registry = SessionRegistry::new();
        let mut rng = StdRng::seed_from_u64(7);
        let (first, _) = registry.start_session(4, 4, 0.0, &mut rng).unwrap();
        let (second, _) = registry.start_session(4, 4, 0.0, &mut rng).unwrap();
        assert_ne!(first, second);

        let latest_start = registry.maze(None).unwrap().start();
        assert_eq!(registry.maze(Some(second)).unwrap().start(), latest_start);
        // both sessions stay addressable by id
        assert!(registry.maze(Some(first)).is_some());
        assert_eq!(registry.stats().sessions_solved, 0);
    }

    #[test]
    fn discover_goes_through_the_bounds_check() {
        let mut registry = SessionRegistry::new();
        let mut rng = StdRng::seed_from_u64(3);
        let (id, _) = registry.start_session(3, 3, 0.0, &mut rng).unwrap();
        assert!(registry.discover(Some(id), 2, 2).is_ok());
        assert_eq!(
            registry.discover(Some(id), 3, 0),
            Err(SessionError::Maze(MazeError::OutOfBounds { x: 3, y: 0 }))
        );
    }
}

use anyhow::{anyhow, Result};
use rand::Rng;

use mazelib::{Backtracker, SessionStats};

use crate::api_trait::MazeApi;

/// Plays labyrinths through a `MazeApi`: wake up, then walk blind with the
/// backtracking solver until the server reports victory.
pub struct Runner {
    api: Box<dyn MazeApi>,
}

impl Runner {
    pub fn new(api: Box<dyn MazeApi>) -> Self {
        Self { api }
    }

    /// Solves one labyrinth and returns the number of successful moves.
    pub async fn solve_one<R: Rng>(&self, rng: &mut R) -> Result<u32> {
        let reply = self.api.awake().await?;
        if reply.error {
            return Err(anyhow!("awake failed: {}", reply.message));
        }

        let mut walker = Backtracker::new(reply.survey);
        let mut moves = 0u32;
        loop {
            let Some(dir) = walker.next_move(rng) else {
                return Err(anyhow!(
                    "every reachable room explored without finding the treasure after {} moves",
                    moves
                ));
            };
            let reply = self.api.move_in(dir).await?;
            if reply.victory {
                return Ok(moves + 1);
            }
            if reply.error {
                walker.blocked();
                continue;
            }
            moves += 1;
            walker.arrived(reply.survey);
        }
    }

    pub async fn done(&self) -> Result<SessionStats> {
        self.api.done().await
    }
}

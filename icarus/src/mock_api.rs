use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use mazelib::{Direction, Reply, SessionMove, SessionRegistry, SessionStats};

use crate::api_trait::MazeApi;

/// In-process daedalus: a real session registry behind the client trait,
/// with a seeded generator so runs are reproducible. Lets the runner (and
/// its tests) play entire labyrinths without a server.
pub struct MockMazeApi {
    inner: Mutex<MockState>,
    width: usize,
    height: usize,
    braid: f64,
}

struct MockState {
    registry: SessionRegistry,
    rng: StdRng,
}

impl MockMazeApi {
    pub fn new(width: usize, height: usize, braid: f64, seed: u64) -> Self {
        Self {
            inner: Mutex::new(MockState {
                registry: SessionRegistry::new(),
                rng: StdRng::seed_from_u64(seed),
            }),
            width,
            height,
            braid,
        }
    }
}

#[async_trait]
impl MazeApi for MockMazeApi {
    async fn awake(&self) -> Result<Reply> {
        let mut state = self.inner.lock().await;
        let MockState { registry, rng } = &mut *state;
        let reply = match registry.start_session(self.width, self.height, self.braid, rng) {
            Ok((_, survey)) => Reply::with_survey(survey),
            Err(err) => Reply::failure(err.to_string()),
        };
        Ok(reply)
    }

    async fn move_in(&self, direction: Direction) -> Result<Reply> {
        let mut state = self.inner.lock().await;
        // rule violations become error replies, exactly like the server
        let reply = match state.registry.move_agent(None, direction) {
            Ok(SessionMove::Victory { steps }) => {
                Reply::victorious(format!("Victory achieved in {} steps", steps))
            }
            Ok(SessionMove::Moved(survey)) => Reply::with_survey(survey),
            Err(err) => Reply::failure(err.to_string()),
        };
        Ok(reply)
    }

    async fn done(&self) -> Result<SessionStats> {
        Ok(self.inner.lock().await.registry.stats())
    }
}

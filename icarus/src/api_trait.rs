use anyhow::Result;
use async_trait::async_trait;

use mazelib::{Direction, Reply, SessionStats};

/// The daedalus contract as seen from the client side: wake up in a fresh
/// maze, move one room at a time, report when done. Implemented over HTTP
/// and by an in-process mock.
#[async_trait]
pub trait MazeApi: Send + Sync {
    async fn awake(&self) -> Result<Reply>;
    async fn move_in(&self, direction: Direction) -> Result<Reply>;
    async fn done(&self) -> Result<SessionStats>;
}

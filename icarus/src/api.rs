use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use mazelib::{Direction, Reply, SessionStats};

use crate::api_trait::MazeApi;

/// HTTP client for a daedalus server.
#[derive(Debug, Clone)]
pub struct HttpMazeApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpMazeApi {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    async fn get_reply(&self, path: &str) -> Result<Reply> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        // Daedalus answers rule violations (walls, bounds, missing session)
        // with 409 and the same reply body; anything else non-2xx is a real
        // transport problem.
        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::CONFLICT {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("{} failed with status {}: {}", url, status, text));
        }

        let reply: Reply = response
            .json()
            .await
            .with_context(|| format!("invalid reply from {}", url))?;
        Ok(reply)
    }
}

#[async_trait]
impl MazeApi for HttpMazeApi {
    async fn awake(&self) -> Result<Reply> {
        self.get_reply("/awake").await
    }

    async fn move_in(&self, direction: Direction) -> Result<Reply> {
        self.get_reply(&format!("/move/{}", direction)).await
    }

    async fn done(&self) -> Result<SessionStats> {
        let url = format!("{}/done", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("{} failed with status {}: {}", url, status, text));
        }

        let stats: SessionStats = response
            .json()
            .await
            .with_context(|| format!("invalid stats from {}", url))?;
        Ok(stats)
    }
}

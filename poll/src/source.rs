use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use banpick_library::{StatusMap, StatusResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<StatusMap>;
}

/// Reads the lock board from the `/api/character-status` endpoint.
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: String,
}

impl HttpStatusSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<StatusMap> {
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let body: StatusResponse = response.json().await?;
        Ok(body.status)
    }
}

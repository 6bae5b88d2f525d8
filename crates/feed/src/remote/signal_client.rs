use async_trait::async_trait;
use common::{config::BoardConfig, models::SignalPage};
use reqwest::Client;
use tracing::debug;

use crate::{error::PollError, traits::SignalSource};

pub struct SignalClient {
    client: Client,
    url: String,
    limit: u32,
}

impl SignalClient {
    pub fn new(config: &BoardConfig) -> Result<Self, PollError> {
        let client = Client::builder()
            .user_agent(concat!("signal_board/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.signals_url(),
            limit: config.limit,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn make_request(&self) -> Result<SignalPage, PollError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("limit", self.limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }

        let body = response.bytes().await?;
        let page = serde_json::from_slice::<SignalPage>(&body)?;
        debug!(
            "Fetched {} signals ({} known to server)",
            page.signals.len(),
            page.total
        );
        Ok(page)
    }
}

#[async_trait]
impl SignalSource for SignalClient {
    async fn fetch_page(&self) -> Result<SignalPage, PollError> {
        self.make_request().await
    }
}

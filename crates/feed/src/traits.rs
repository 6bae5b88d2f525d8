use async_trait::async_trait;
use common::models::SignalPage;

use crate::error::PollError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Fetches the most recent window of signals, oldest first.
    async fn fetch_page(&self) -> Result<SignalPage, PollError>;
}

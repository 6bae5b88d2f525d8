use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use common::actors::{Actor, ActorType, ControlMessage};
use tokio::{
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{store::SignalStore, traits::SignalSource};

/// Polls the signal source on a fixed cadence. Every tick spawns its own poll,
/// so a slow request never delays the next one; the store's generation check
/// drops whichever response turns out to be stale.
pub struct SignalPoller {
    source: Arc<dyn SignalSource>,
    store: Arc<SignalStore>,
    poll_interval: Duration,
    cancel: CancellationToken,
}

#[async_trait]
impl Actor for SignalPoller {
    fn name(&self) -> ActorType {
        ActorType::PollerActor
    }

    async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
        let heartbeat_handle = self.spawn_heartbeat(supervisor_tx.clone());

        info!("Starting Signal Poller, every {:?}", self.poll_interval);
        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.spawn_poll();
                }
            }
        }

        heartbeat_handle.abort();
        info!("Signal Poller stopped");
        let _ = supervisor_tx.try_send(ControlMessage::Shutdown(self.name()));
        Ok(())
    }
}

impl SignalPoller {
    pub fn new(
        source: Arc<dyn SignalSource>,
        store: Arc<SignalStore>,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            store,
            poll_interval,
            cancel,
        }
    }

    fn spawn_poll(&self) {
        let generation = self.store.next_generation();
        let source = self.source.clone();
        let store = self.store.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Poll #{} abandoned on shutdown", generation);
                    return;
                }
                result = source.fetch_page() => result,
            };

            match result {
                Ok(page) => {
                    if cancel.is_cancelled() {
                        return;
                    }
                    let rows = page.signals.len();
                    let total = page.total;
                    if store.apply(generation, page) {
                        debug!("Poll #{} applied: {} rows, {} total", generation, rows, total);
                    } else {
                        debug!("Poll #{} resolved late, discarded", generation);
                    }
                }
                Err(e) => {
                    warn!("Bot not running? Poll #{} failed: {}", generation, e);
                }
            }
        });
    }
}

use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use common::actors::{Actor, ActorType};
use common::config::BoardConfig;
use common::logger;
use feed::remote::SignalClient;
use feed::services::SignalPoller;
use feed::store::SignalStore;
use feed::traits::SignalSource;

use crate::actors::supervisor::Supervisor;

mod actors;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = BoardConfig::from_env()?;
    logger::setup_logger(&config.log_file)?;
    info!("Signal board starting up...");
    debug!("Configuration: {:?}", config);

    let client = SignalClient::new(&config)?;
    info!(
        "Polling {}?limit={} every {:?}",
        client.url(),
        config.limit,
        config.poll_interval
    );
    let source: Arc<dyn SignalSource> = Arc::new(client);
    let store = Arc::new(SignalStore::new());
    let cancel = CancellationToken::new();

    let mut supervisor = Supervisor::new(cancel.clone());

    let store_for_poller = store.clone();
    let cancel_for_poller = cancel.clone();
    let poll_interval = config.poll_interval;
    supervisor.register_actor(
        ActorType::PollerActor,
        Box::new(move || -> Box<dyn Actor> {
            Box::new(SignalPoller::new(
                source.clone(),
                store_for_poller.clone(),
                poll_interval,
                cancel_for_poller.clone(),
            ))
        }),
    );

    let supervisor_handle = tokio::spawn(async move { supervisor.start().await });

    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            cancel_on_signal.cancel();
        }
    });

    let result = view::run(store.subscribe(), cancel.clone()).await;

    cancel.cancel();
    supervisor_handle.await?;
    info!("Signal board stopped");
    result
}

use std::{collections::HashMap, time::Duration};
use tracing::{error, info, warn};

use common::actors::{Actor, ActorType, ControlMessage};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant},
};
use tokio_util::sync::CancellationToken;

type ActorFactory = Box<dyn Fn() -> Box<dyn Actor> + Send + Sync>;

const CHECK_PERIOD: Duration = Duration::from_secs(1);
const PULSE_TIMEOUT: Duration = Duration::from_secs(3);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub struct Supervisor {
    actor_factories: HashMap<ActorType, ActorFactory>,
    pulses: HashMap<ActorType, Instant>,
    handles: HashMap<ActorType, JoinHandle<()>>,
    cancel: CancellationToken,
}

impl Supervisor {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            actor_factories: HashMap::new(),
            pulses: HashMap::new(),
            handles: HashMap::new(),
            cancel,
        }
    }

    pub fn register_actor(&mut self, actor_type: ActorType, factory: ActorFactory) {
        self.actor_factories.insert(actor_type, factory);
    }

    /// Runs until the cancellation token fires, restarting any actor that
    /// stops sending heartbeats.
    pub async fn start(&mut self) {
        let mut check_interval = time::interval(CHECK_PERIOD);
        let cancel = self.cancel.clone();

        let (supervisor_tx, mut supervisor_rx) = mpsc::channel::<ControlMessage>(512);

        let actors: Vec<ActorType> = self.actor_factories.keys().copied().collect();
        actors.into_iter().for_each(|actor| {
            self.spawn_actor(actor, supervisor_tx.clone());
        });

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                Some(msg) = supervisor_rx.recv() => {
                    match msg {
                        ControlMessage::Heartbeat(actor_type) => {
                            if self.handles.contains_key(&actor_type) {
                                self.pulses.insert(actor_type, Instant::now());
                            }
                        }
                        ControlMessage::Shutdown(actor_type) => {
                            warn!("{:?} is shutting down gracefully.", actor_type);
                            self.pulses.remove(&actor_type);
                            self.handles.remove(&actor_type);
                        },
                        ControlMessage::Error(actor_type, error_msg) => {
                            error!("Actor {:?} reported error: {}", actor_type, error_msg);
                            self.pulses.insert(actor_type, Instant::now());
                        },
                    }
                }

                _ = check_interval.tick() => {
                    let dead_actors: Vec<ActorType> = self
                        .pulses
                        .iter()
                        .filter(|(_, last)| last.elapsed() > PULSE_TIMEOUT)
                        .map(|(actor_type, _)| *actor_type)
                        .collect();

                    dead_actors.into_iter().for_each(|actor_type| {
                        warn!("{:?} is unresponsive! Restarting.", actor_type);
                        if let Some(handle) = self.handles.remove(&actor_type) {
                            handle.abort();
                        }
                        self.spawn_actor(actor_type, supervisor_tx.clone());
                    });
                }
            }
        }

        self.stop_all().await;
    }

    async fn stop_all(&mut self) {
        self.pulses.clear();
        for (actor_type, handle) in self.handles.drain() {
            let abort_handle = handle.abort_handle();
            if time::timeout(SHUTDOWN_GRACE, handle).await.is_err() {
                warn!("{:?} did not stop in time, aborting.", actor_type);
                abort_handle.abort();
            }
        }
        info!("Supervisor stopped");
    }

    fn spawn_actor(&mut self, actor_type: ActorType, tx: mpsc::Sender<ControlMessage>) {
        let Some(factory) = self.actor_factories.get(&actor_type) else {
            error!("No factory registered for {:?}", actor_type);
            return;
        };
        let mut new_actor = factory();
        let new_actor_handle = tokio::spawn(async move {
            if let Err(e) = new_actor.run(tx).await {
                error!("Actor {:?} crashed: {}", &actor_type, e);
            }
        });
        self.handles.insert(actor_type, new_actor_handle);
        self.pulses.insert(actor_type, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    /// Crashes straight away without ever sending a heartbeat.
    struct CrashingActor;

    #[async_trait]
    impl Actor for CrashingActor {
        fn name(&self) -> ActorType {
            ActorType::PollerActor
        }

        async fn run(&mut self, _supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
            anyhow::bail!("lost the endpoint")
        }
    }

    /// Heartbeats until cancelled.
    struct SteadyActor {
        cancel: CancellationToken,
    }

    #[async_trait]
    impl Actor for SteadyActor {
        fn name(&self) -> ActorType {
            ActorType::PollerActor
        }

        async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
            let heartbeat_handle = self.spawn_heartbeat(supervisor_tx);
            self.cancel.cancelled().await;
            heartbeat_handle.abort();
            Ok(())
        }
    }

    /// Heartbeats for a second, then panics.
    struct PanickingActor;

    #[async_trait]
    impl Actor for PanickingActor {
        fn name(&self) -> ActorType {
            ActorType::PollerActor
        }

        async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
            let _heartbeat = self.spawn_heartbeat(supervisor_tx);
            time::sleep(Duration::from_secs(1)).await;
            panic!("poller blew up");
        }
    }

    fn counting_factory<F>(spawned: Arc<AtomicUsize>, make: F) -> ActorFactory
    where
        F: Fn() -> Box<dyn Actor> + Send + Sync + 'static,
    {
        Box::new(move || {
            spawned.fetch_add(1, Ordering::SeqCst);
            make()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarts_actor_without_pulse() {
        let cancel = CancellationToken::new();
        let spawned = Arc::new(AtomicUsize::new(0));

        let mut supervisor = Supervisor::new(cancel.clone());
        supervisor.register_actor(
            ActorType::PollerActor,
            counting_factory(spawned.clone(), || -> Box<dyn Actor> { Box::new(CrashingActor) }),
        );
        let handle = tokio::spawn(async move { supervisor.start().await });

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(spawned.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_millis(4000)).await;
        assert!(spawned.load(Ordering::SeqCst) >= 2);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicked_actor_is_restarted() {
        let cancel = CancellationToken::new();
        let spawned = Arc::new(AtomicUsize::new(0));

        let mut supervisor = Supervisor::new(cancel.clone());
        supervisor.register_actor(
            ActorType::PollerActor,
            counting_factory(spawned.clone(), || -> Box<dyn Actor> { Box::new(PanickingActor) }),
        );
        let handle = tokio::spawn(async move { supervisor.start().await });

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(spawned.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_millis(3000)).await;
        assert!(spawned.load(Ordering::SeqCst) >= 2);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_healthy_actor_is_left_alone_and_stopped_on_cancel() {
        let cancel = CancellationToken::new();
        let spawned = Arc::new(AtomicUsize::new(0));

        let mut supervisor = Supervisor::new(cancel.clone());
        let actor_cancel = cancel.clone();
        supervisor.register_actor(
            ActorType::PollerActor,
            counting_factory(spawned.clone(), move || -> Box<dyn Actor> {
                Box::new(SteadyActor {
                    cancel: actor_cancel.clone(),
                })
            }),
        );
        let handle = tokio::spawn(async move { supervisor.start().await });

        time::sleep(Duration::from_secs(12)).await;
        assert_eq!(spawned.load(Ordering::SeqCst), 1);

        cancel.cancel();
        handle.await.unwrap();
    }
}

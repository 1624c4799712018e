//! # WorkerManager: owns the fleet and drives its lifecycle.
//!
//! The [`WorkerManager`] holds two worker collections (transient workers
//! spawned by count at startup and restart-eligible; durable workers added
//! individually and excluded from bulk restarts), the restart channel
//! endpoints, the shared worker-state registry, and the event bus.
//!
//! ## High-level architecture
//! ```text
//! Inputs to new():
//!   count N ── factory ── (publisher, subscriber) ── registry
//!
//! run():
//!   start() ──► monitor() ──► join() ──► terminate()
//!     │            │            │            │
//!     │            │            │            └─ request exit, any state
//!     │            │            └─ fixpoint loop over state < Joined
//!     │            └─ poll restart channel, dispatch restart()
//!     └─ spawn every process, record pids in the registry
//!
//! Shutdown path (signal-initiated):
//!   signal listener ─► cancel shutdown token
//!                   ─► sentinel on restart channel
//!                   ─► SignalReceived event
//!   monitor() observes either ─► SIGTERM straight to every alive pid
//!                             ─► break ─► join() reaps ─► terminate()
//! ```
//!
//! ## Rules
//! - The worker collections and the registry are mutated only by the
//!   supervising task; the signal listener touches nothing but the
//!   channel, the bus, and the shutdown token.
//! - The sentinel is always published before any terminate signal, so the
//!   monitor observes shutdown intent before processes start dying.
//! - Restart requests dispatch sequentially in arrival order; there is no
//!   coalescing of repeated requests for the same worker.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::channel::{RestartMessage, RestartPublisher, RestartSubscriber};
use crate::config::ManagerConfig;
use crate::core::registry::{WorkerInfo, WorkerRegistry, MAIN_REGISTRY_KEY};
use crate::core::signals::{self, TermSignal};
use crate::error::SuperviseError;
use crate::events::{Bus, Event, EventKind};
use crate::process::{terminate_pid, ProcessFactory, ProcessState, Worker};
use crate::subscribers::Subscribe;

/// Supervises a fleet of worker processes from one controlling process.
///
/// Constructed once at service startup; lives for the supervising
/// process's entire life; torn down when [`run`](WorkerManager::run)
/// returns.
pub struct WorkerManager {
    cfg: ManagerConfig,
    transient: Vec<Worker>,
    durable: Vec<Worker>,
    restart_publisher: RestartPublisher,
    restart_subscriber: RestartSubscriber,
    registry: WorkerRegistry,
    bus: Bus,
    subs: Vec<Arc<dyn Subscribe>>,
    shutdown: CancellationToken,
}

impl WorkerManager {
    /// Creates a manager with `number` transient workers named
    /// `Worker-0` … `Worker-(number-1)`, all drawn from the same factory.
    ///
    /// Registers the supervisor's own pid in the registry under
    /// [`MAIN_REGISTRY_KEY`] so workers can discover it. Never blocks and
    /// never spawns a worker process; when `cfg.handle_signals` is set it
    /// spawns the signal listener task, which requires a running Tokio
    /// runtime.
    pub fn new(
        cfg: ManagerConfig,
        number: usize,
        factory: &dyn ProcessFactory,
        restart_pubsub: (RestartPublisher, RestartSubscriber),
        registry: WorkerRegistry,
    ) -> Self {
        let (restart_publisher, restart_subscriber) = restart_pubsub;
        let bus = Bus::new(cfg.bus_capacity);

        registry.insert(
            MAIN_REGISTRY_KEY,
            WorkerInfo {
                pid: std::process::id(),
            },
        );

        let mut manager = Self {
            cfg,
            transient: Vec::with_capacity(number),
            durable: Vec::new(),
            restart_publisher,
            restart_subscriber,
            registry,
            bus,
            subs: Vec::new(),
            shutdown: CancellationToken::new(),
        };
        for i in 0..number {
            manager.manage(format!("Worker-{i}"), factory, true);
        }
        if manager.cfg.handle_signals {
            manager.spawn_signal_listener();
        }
        manager
    }

    /// Appends a worker to the transient or durable collection.
    ///
    /// Used both at construction (the N transient workers) and by external
    /// collaborators registering a durable worker (e.g., a reload watcher)
    /// before [`run`](WorkerManager::run). Names must be unique across both
    /// collections; the restart filter and the registry key assume it.
    pub fn manage(
        &mut self,
        name: impl Into<String>,
        factory: &dyn ProcessFactory,
        transient: bool,
    ) {
        let worker = Worker::new(name, factory);
        if transient {
            self.transient.push(worker);
        } else {
            self.durable.push(worker);
        }
    }

    /// Registers an event subscriber. Call before [`run`](WorkerManager::run).
    pub fn add_subscriber(&mut self, subscriber: Arc<dyn Subscribe>) {
        self.subs.push(subscriber);
    }

    /// The transient workers, in creation order.
    pub fn transient_workers(&self) -> &[Worker] {
        &self.transient
    }

    /// The durable workers, in creation order.
    pub fn durable_workers(&self) -> &[Worker] {
        &self.durable
    }

    /// All workers, transient first.
    pub fn workers(&self) -> impl Iterator<Item = &Worker> {
        self.transient.iter().chain(self.durable.iter())
    }

    /// Every tracked process, in collection order then per-worker
    /// insertion order.
    pub fn processes(&self) -> impl Iterator<Item = &crate::process::ProcessRef> {
        self.workers().flat_map(|worker| worker.processes().iter())
    }

    /// Every process belonging to a transient worker.
    pub fn transient_processes(&self) -> impl Iterator<Item = &crate::process::ProcessRef> {
        self.transient.iter().flat_map(|worker| worker.processes().iter())
    }

    /// The supervisor's single blocking entry point.
    ///
    /// Runs `start → monitor → join → terminate` strictly in sequence and
    /// returns only after shutdown completes. Process-layer failures in
    /// any phase propagate; the supervisor has no degraded mode.
    pub async fn run(&mut self) -> Result<(), SuperviseError> {
        self.spawn_event_listener();
        self.start().await?;
        self.monitor().await?;
        self.join().await?;
        self.terminate().await?;
        self.bus.publish(Event::new(EventKind::ManagerStopped));
        Ok(())
    }

    /// Starts every process across every worker, transient collection
    /// first, then per-worker insertion order. Records each started pid in
    /// the registry under the worker name.
    pub async fn start(&mut self) -> Result<(), SuperviseError> {
        for worker in self.transient.iter_mut().chain(self.durable.iter_mut()) {
            for process in worker.processes_mut() {
                process.start().await?;
                if let Some(pid) = process.pid() {
                    self.registry.insert(process.name(), WorkerInfo { pid });
                }
                self.bus.publish(process_event(
                    EventKind::ProcessStarted,
                    process.name(),
                    process.pid(),
                ));
            }
        }
        Ok(())
    }

    /// Restart-dispatch loop.
    ///
    /// Polls the restart channel with `cfg.poll_interval` so the loop
    /// stays responsive to the shutdown token between messages. Restart
    /// records dispatch to [`restart`](WorkerManager::restart); the
    /// shutdown sentinel (or a closed channel) ends the loop. When the
    /// shutdown was signal-initiated, the direct termination sweep runs
    /// here, on the supervising task, before the loop exits.
    pub async fn monitor(&mut self) -> Result<(), SuperviseError> {
        loop {
            let message = if self.shutdown.is_cancelled() {
                Some(RestartMessage::Shutdown)
            } else {
                self.restart_subscriber.poll(self.cfg.poll_interval).await
            };

            match message {
                None => continue,
                Some(RestartMessage::Shutdown) => {
                    self.bus.publish(Event::new(EventKind::ShutdownRequested));
                    if self.shutdown.is_cancelled() {
                        self.terminate_alive_processes();
                    }
                    break;
                }
                Some(RestartMessage::Restart { names, files }) => {
                    let filter = match names.as_deref() {
                        Some(names) => names.join(","),
                        None => "all".to_string(),
                    };
                    self.bus
                        .publish(Event::new(EventKind::RestartRequested).with_reason(filter));
                    self.restart(names.as_deref(), &files).await?;
                }
            }
        }
        Ok(())
    }

    /// Reaps every process until none remains below
    /// [`ProcessState::Joined`].
    ///
    /// A restart can add fresh processes mid-run, so after any pass that
    /// joined at least one process the whole fleet is scanned again; the
    /// loop ends on the first pass that joins nothing. A hung worker
    /// stalls this phase indefinitely: no timeout is applied here.
    pub async fn join(&mut self) -> Result<(), SuperviseError> {
        loop {
            let mut joined = 0usize;
            for worker in self.transient.iter_mut().chain(self.durable.iter_mut()) {
                for process in worker.processes_mut() {
                    if process.state() < ProcessState::Joined {
                        process.join().await?;
                        joined += 1;
                        self.bus.publish(process_event(
                            EventKind::ProcessJoined,
                            process.name(),
                            process.pid(),
                        ));
                    }
                }
            }
            if joined == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Requests termination of every tracked process, regardless of state.
    /// Idempotent against already-terminated processes.
    pub async fn terminate(&mut self) -> Result<(), SuperviseError> {
        for worker in self.transient.iter_mut().chain(self.durable.iter_mut()) {
            for process in worker.processes_mut() {
                process.terminate().await?;
                self.bus.publish(process_event(
                    EventKind::ProcessTerminated,
                    process.name(),
                    process.pid(),
                ));
            }
        }
        Ok(())
    }

    /// Restarts transient workers matching the filter.
    ///
    /// `process_names` of `None` means every transient worker; otherwise a
    /// worker restarts only when its name is in the list. Durable workers
    /// are never restarted through this path. Requests for a worker whose
    /// previous restart has not completed queue behind it and run in
    /// arrival order; there is no de-duplication.
    pub async fn restart(
        &mut self,
        process_names: Option<&[String]>,
        reloaded_files: &[String],
    ) -> Result<(), SuperviseError> {
        for worker in self.transient.iter_mut() {
            let selected = match process_names {
                None => true,
                Some(names) => names.iter().any(|name| name.as_str() == worker.name()),
            };
            if !selected {
                continue;
            }
            worker.restart(reloaded_files).await?;
            for process in worker.processes() {
                if let Some(pid) = process.pid() {
                    self.registry.insert(process.name(), WorkerInfo { pid });
                }
                self.bus.publish(process_event(
                    EventKind::WorkerRestarted,
                    process.name(),
                    process.pid(),
                ));
            }
        }
        Ok(())
    }

    /// Shutdown entry for embedders that run their own signal handling.
    ///
    /// Performs the full signal-shutdown contract in order: publishes
    /// exactly one shutdown sentinel on the restart channel, reports the
    /// signal on the event bus, delivers a terminate signal directly to
    /// the pid of every process that is currently alive (bypassing the
    /// process's own terminate method), and cancels the shutdown token.
    pub fn kill(&self, signal: TermSignal) {
        self.restart_publisher.shutdown();
        self.bus
            .publish(Event::new(EventKind::SignalReceived).with_reason(signal.name()));
        self.terminate_alive_processes();
        self.shutdown.cancel();
    }

    /// SIGTERM straight to every alive pid across both collections.
    fn terminate_alive_processes(&self) {
        for worker in self.transient.iter().chain(self.durable.iter()) {
            for process in worker.processes() {
                if !process.is_alive() {
                    continue;
                }
                if let Some(pid) = process.pid() {
                    // The process may die between the probe and the signal.
                    let _ = terminate_pid(pid);
                }
            }
        }
    }

    /// Waits for SIGINT/SIGTERM and converts it into shutdown intent.
    ///
    /// The token is cancelled before the sentinel goes out so that the
    /// monitor, whichever way it wakes, always recognizes the shutdown as
    /// signal-initiated and runs the termination sweep. Process-list
    /// iteration is deferred to the supervising task (see `monitor`).
    fn spawn_signal_listener(&self) {
        let publisher = self.restart_publisher.clone();
        let bus = self.bus.clone();
        let token = self.shutdown.clone();
        tokio::spawn(async move {
            match signals::wait_for_termination_signal().await {
                Ok(signal) => {
                    token.cancel();
                    publisher.shutdown();
                    bus.publish(
                        Event::new(EventKind::SignalReceived).with_reason(signal.name()),
                    );
                }
                Err(e) => {
                    bus.publish(
                        Event::new(EventKind::SignalListenerFailed).with_reason(e.to_string()),
                    );
                }
            }
        });
    }

    /// Subscribes to the bus and forwards events to the registered
    /// subscribers, in publish order.
    fn spawn_event_listener(&self) {
        if self.subs.is_empty() {
            return;
        }
        let mut rx = self.bus.subscribe();
        let subs = self.subs.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        for sub in &subs {
                            sub.on_event(&ev).await;
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    #[cfg(test)]
    pub(crate) fn restart_subscriber_mut(&mut self) -> &mut RestartSubscriber {
        &mut self.restart_subscriber
    }
}

fn process_event(kind: EventKind, worker: &str, pid: Option<u32>) -> Event {
    let mut ev = Event::new(kind).with_worker(worker);
    if let Some(pid) = pid {
        ev = ev.with_pid(pid);
    }
    ev
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::channel::restart_channel;
    use crate::error::ProcessError;
    use crate::process::{ManagedProcess, ProcessRef};

    const POLL: Duration = Duration::from_millis(20);

    #[derive(Clone, Default)]
    struct Counters {
        starts: Arc<AtomicUsize>,
        joins: Arc<AtomicUsize>,
        terminates: Arc<AtomicUsize>,
        restarts: Arc<AtomicUsize>,
        alive: Arc<AtomicBool>,
        files: Arc<Mutex<Vec<String>>>,
    }

    struct FakeProcess {
        name: String,
        state: ProcessState,
        counters: Counters,
    }

    #[async_trait]
    impl ManagedProcess for FakeProcess {
        fn name(&self) -> &str {
            &self.name
        }

        fn state(&self) -> ProcessState {
            self.state
        }

        fn pid(&self) -> Option<u32> {
            None
        }

        fn is_alive(&self) -> bool {
            self.counters.alive.load(Ordering::SeqCst)
        }

        async fn start(&mut self) -> Result<(), ProcessError> {
            self.counters.starts.fetch_add(1, Ordering::SeqCst);
            self.counters.alive.store(true, Ordering::SeqCst);
            self.state = ProcessState::Started;
            Ok(())
        }

        async fn join(&mut self) -> Result<(), ProcessError> {
            self.counters.joins.fetch_add(1, Ordering::SeqCst);
            self.counters.alive.store(false, Ordering::SeqCst);
            self.state = ProcessState::Joined;
            Ok(())
        }

        async fn terminate(&mut self) -> Result<(), ProcessError> {
            self.counters.terminates.fetch_add(1, Ordering::SeqCst);
            self.counters.alive.store(false, Ordering::SeqCst);
            self.state = ProcessState::Terminated;
            Ok(())
        }

        async fn restart(&mut self, reloaded_files: &[String]) -> Result<(), ProcessError> {
            self.counters.restarts.fetch_add(1, Ordering::SeqCst);
            self.counters.files.lock().extend_from_slice(reloaded_files);
            self.state = ProcessState::Started;
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeFactory {
        created: Mutex<HashMap<String, Counters>>,
    }

    impl FakeFactory {
        fn counters(&self, name: &str) -> Counters {
            self.created
                .lock()
                .get(name)
                .cloned()
                .expect("worker was never created")
        }
    }

    impl ProcessFactory for FakeFactory {
        fn create(&self, name: &str) -> ProcessRef {
            let counters = Counters::default();
            self.created
                .lock()
                .insert(name.to_string(), counters.clone());
            Box::new(FakeProcess {
                name: name.to_string(),
                state: ProcessState::Idle,
                counters,
            })
        }
    }

    fn test_config() -> ManagerConfig {
        ManagerConfig {
            poll_interval: Duration::from_millis(10),
            bus_capacity: 64,
            handle_signals: false,
        }
    }

    fn manager_with(number: usize, factory: &FakeFactory) -> (WorkerManager, RestartPublisher) {
        let (publisher, subscriber) = restart_channel();
        let manager = WorkerManager::new(
            test_config(),
            number,
            factory,
            (publisher.clone(), subscriber),
            WorkerRegistry::new(),
        );
        (manager, publisher)
    }

    #[test]
    fn constructor_builds_named_transient_workers() {
        let factory = FakeFactory::default();
        let (manager, _publisher) = manager_with(3, &factory);

        let names: Vec<&str> = manager.transient_workers().iter().map(|w| w.name()).collect();
        assert_eq!(names, ["Worker-0", "Worker-1", "Worker-2"]);
        assert!(manager.durable_workers().is_empty());

        let (empty, _publisher) = manager_with(0, &FakeFactory::default());
        assert!(empty.transient_workers().is_empty());
    }

    #[test]
    fn constructor_registers_the_supervisor_pid() {
        let factory = FakeFactory::default();
        let (publisher, subscriber) = restart_channel();
        let registry = WorkerRegistry::new();
        let _manager = WorkerManager::new(
            test_config(),
            0,
            &factory,
            (publisher, subscriber),
            registry.clone(),
        );

        assert_eq!(
            registry.get(MAIN_REGISTRY_KEY),
            Some(WorkerInfo {
                pid: std::process::id()
            })
        );
    }

    #[test]
    fn manage_keeps_collections_disjoint_and_union_transient_first() {
        let factory = FakeFactory::default();
        let (mut manager, _publisher) = manager_with(1, &factory);

        manager.manage("extra", &factory, true);
        manager.manage("reloader", &factory, false);

        assert_eq!(manager.transient_workers().len(), 2);
        assert_eq!(manager.durable_workers().len(), 1);

        let names: Vec<&str> = manager.workers().map(|w| w.name()).collect();
        assert_eq!(names, ["Worker-0", "extra", "reloader"]);
    }

    #[tokio::test]
    async fn join_is_idempotent() {
        let factory = FakeFactory::default();
        let (mut manager, _publisher) = manager_with(2, &factory);

        manager.start().await.unwrap();
        manager.join().await.unwrap();
        assert_eq!(factory.counters("Worker-0").joins.load(Ordering::SeqCst), 1);
        assert_eq!(factory.counters("Worker-1").joins.load(Ordering::SeqCst), 1);

        // All processes report joined: a second call performs zero joins.
        manager.join().await.unwrap();
        assert_eq!(factory.counters("Worker-0").joins.load(Ordering::SeqCst), 1);
        assert_eq!(factory.counters("Worker-1").joins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn restart_targets_only_named_transient_workers() {
        let transient_factory = FakeFactory::default();
        let durable_factory = FakeFactory::default();
        let (mut manager, _publisher) = manager_with(2, &transient_factory);
        // A durable worker coincidentally sharing a transient name.
        manager.manage("Worker-1", &durable_factory, false);

        manager
            .restart(Some(&["Worker-1".to_string()]), &["app.rs".to_string()])
            .await
            .unwrap();

        let transients = &transient_factory;
        assert_eq!(transients.counters("Worker-0").restarts.load(Ordering::SeqCst), 0);
        assert_eq!(transients.counters("Worker-1").restarts.load(Ordering::SeqCst), 1);
        assert_eq!(
            durable_factory.counters("Worker-1").restarts.load(Ordering::SeqCst),
            0
        );
        assert_eq!(
            *transients.counters("Worker-1").files.lock(),
            vec!["app.rs".to_string()]
        );
    }

    #[tokio::test]
    async fn restart_without_filter_hits_every_transient_worker() {
        let transient_factory = FakeFactory::default();
        let durable_factory = FakeFactory::default();
        let (mut manager, _publisher) = manager_with(2, &transient_factory);
        manager.manage("reloader", &durable_factory, false);

        manager.restart(None, &[]).await.unwrap();

        assert_eq!(
            transient_factory.counters("Worker-0").restarts.load(Ordering::SeqCst),
            1
        );
        assert_eq!(
            transient_factory.counters("Worker-1").restarts.load(Ordering::SeqCst),
            1
        );
        assert_eq!(
            durable_factory.counters("reloader").restarts.load(Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn monitor_dispatches_wire_messages_until_the_sentinel() {
        let factory = FakeFactory::default();
        let (mut manager, publisher) = manager_with(2, &factory);

        publisher.send_line("Worker-0:lib.rs");
        publisher.send_line("");

        manager.monitor().await.unwrap();

        assert_eq!(factory.counters("Worker-0").restarts.load(Ordering::SeqCst), 1);
        assert_eq!(factory.counters("Worker-1").restarts.load(Ordering::SeqCst), 0);
        assert_eq!(
            *factory.counters("Worker-0").files.lock(),
            vec!["lib.rs".to_string()]
        );
    }

    #[tokio::test]
    async fn kill_publishes_exactly_one_sentinel_and_bypasses_trait_terminate() {
        let factory = FakeFactory::default();
        let (mut manager, _publisher) = manager_with(2, &factory);

        manager.kill(TermSignal::Terminate);

        // Exactly one sentinel on the restart channel.
        let subscriber = manager.restart_subscriber_mut();
        assert_eq!(subscriber.poll(POLL).await, Some(RestartMessage::Shutdown));
        assert_eq!(subscriber.poll(POLL).await, None);

        // The sweep signals pids directly; the process-level terminate
        // method is not involved, and idle processes are skipped.
        assert_eq!(
            factory.counters("Worker-0").terminates.load(Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn run_with_immediate_sentinel_starts_joins_and_terminates() {
        let factory = FakeFactory::default();
        let (publisher, subscriber) = restart_channel();
        let mut manager = WorkerManager::new(
            test_config(),
            2,
            &factory,
            (publisher.clone(), subscriber),
            WorkerRegistry::new(),
        );

        publisher.shutdown();
        manager.run().await.unwrap();

        for name in ["Worker-0", "Worker-1"] {
            let counters = factory.counters(name);
            assert_eq!(counters.starts.load(Ordering::SeqCst), 1, "{name} starts");
            assert_eq!(counters.restarts.load(Ordering::SeqCst), 0, "{name} restarts");
            assert_eq!(counters.joins.load(Ordering::SeqCst), 1, "{name} joins");
            assert_eq!(
                counters.terminates.load(Ordering::SeqCst),
                1,
                "{name} terminates"
            );
        }
    }

    #[tokio::test]
    async fn run_with_zero_workers_returns_cleanly() {
        let factory = FakeFactory::default();
        let (publisher, subscriber) = restart_channel();
        let mut manager = WorkerManager::new(
            test_config(),
            0,
            &factory,
            (publisher.clone(), subscriber),
            WorkerRegistry::new(),
        );

        publisher.shutdown();
        manager.run().await.unwrap();
    }

    #[cfg(unix)]
    mod os {
        use super::*;
        use crate::process::CommandSpec;

        #[tokio::test]
        async fn kill_terminates_alive_os_processes() {
            let spec = CommandSpec::new("sleep").arg("30");
            let (publisher, subscriber) = restart_channel();
            let registry = WorkerRegistry::new();
            let mut manager = WorkerManager::new(
                test_config(),
                2,
                &spec,
                (publisher, subscriber),
                registry.clone(),
            );

            manager.start().await.unwrap();
            assert!(registry.get("Worker-0").is_some());
            assert!(registry.get("Worker-1").is_some());

            manager.kill(TermSignal::Terminate);
            // The sweep delivered SIGTERM; join reaps the exits.
            manager.join().await.unwrap();
            manager.terminate().await.unwrap();

            for process in manager.processes() {
                assert!(!process.is_alive());
                assert!(process.state() >= ProcessState::Joined);
            }
        }
    }
}

use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::HostSources;
use super::collector::Collector;
use super::notify::{Change, Notifier};
use super::snapshot::{MetricsUpdate, Snapshot};
use crate::format::format_clock;

/// Delay before the first acquisition so the presentation layer can mount.
pub const STARTUP_DELAY: Duration = Duration::from_millis(500);
pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);
pub const METRICS_PERIOD: Duration = Duration::from_secs(5);

/// Owns the snapshot and decides when extractors run. All mutation and
/// every notification happen on the thread that owns the poller.
///
/// A slow cycle can run elsewhere: [`Poller::begin_metrics_cycle`] hands
/// out the collector, and [`Poller::finish_metrics_cycle`] applies the
/// result and notifies. While the collector is out, further slow ticks are
/// skipped and clock ticks keep running.
pub struct Poller<S> {
    snapshot: Snapshot,
    collector: Option<Collector<S>>,
    notifier: Notifier,
    clock_format: String,
    started: bool,
}

impl<S: HostSources> Poller<S> {
    pub fn new(collector: Collector<S>, clock_format: impl Into<String>) -> Self {
        Poller {
            snapshot: Snapshot::new(),
            collector: Some(collector),
            notifier: Notifier::new(),
            clock_format: clock_format.into(),
            started: false,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<Change> {
        self.notifier.subscribe()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn cycle_in_flight(&self) -> bool {
        self.collector.is_none()
    }

    /// The deferred one-shot acquisition. Runs once; later calls are ignored.
    pub fn startup(&mut self) {
        if self.started {
            return;
        }
        let Some(collector) = self.collector.as_mut() else {
            return;
        };
        let update = collector.initial_pass();
        self.snapshot.apply_initial(update);
        self.update_clock();
        self.started = true;
        info!(
            os = self.snapshot.os_name(),
            cpu = self.snapshot.cpu_model(),
            volumes = self.snapshot.disk_info().len(),
            "initial acquisition complete"
        );
        self.notifier.publish(Change::Metrics);
    }

    /// Fast cycle: clock only.
    pub fn tick_clock(&mut self) {
        self.update_clock();
        self.notifier.publish(Change::Clock);
    }

    /// Runs a full slow cycle on the current thread. Returns `false` when
    /// a cycle is already in flight elsewhere.
    pub fn refresh_metrics(&mut self) -> bool {
        let Some(mut collector) = self.begin_metrics_cycle() else {
            return false;
        };
        let update = collector.metrics_cycle();
        self.finish_metrics_cycle(collector, update);
        true
    }

    /// Takes the collector out for an off-thread slow cycle.
    pub fn begin_metrics_cycle(&mut self) -> Option<Collector<S>> {
        let collector = self.collector.take();
        if collector.is_none() {
            debug!("slow cycle still in flight, skipping tick");
        }
        collector
    }

    /// Returns the collector, applies the cycle's update and raises a single
    /// metrics notification.
    pub fn finish_metrics_cycle(&mut self, collector: Collector<S>, update: MetricsUpdate) {
        self.collector = Some(collector);
        self.snapshot.apply_metrics(update);
        debug!(
            cpu = self.snapshot.cpu_percent(),
            memory = self.snapshot.memory_percent(),
            volumes = self.snapshot.disk_info().len(),
            "metrics cycle applied"
        );
        self.notifier.publish(Change::Metrics);
    }

    /// Returns the collector from a cycle that produced nothing. The snapshot
    /// is untouched and no notification is raised.
    pub fn abandon_metrics_cycle(&mut self, collector: Collector<S>) {
        self.collector = Some(collector);
    }

    fn update_clock(&mut self) {
        let now = Local::now();
        self.snapshot.set_time(format_clock(&now, &self.clock_format));
    }
}

use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::warn;

use crate::system::HostSources;
use crate::system::collector::Collector;
use crate::system::poller::{CLOCK_PERIOD, METRICS_PERIOD, STARTUP_DELAY};
use crate::system::snapshot::MetricsUpdate;

/// A slow cycle that finished off the event-loop thread.
pub struct MetricsCycle<S> {
    pub collector: Collector<S>,
    pub update: MetricsUpdate,
}

pub enum Event<S> {
    Key(KeyEvent),
    Resize,
    /// Deferred one-shot initial acquisition.
    Startup,
    /// Fast cycle.
    Clock,
    /// Slow cycle is due.
    Metrics,
    MetricsReady(Box<MetricsCycle<S>>),
    /// The slow cycle panicked; the collector comes back without an update.
    MetricsFailed(Box<Collector<S>>),
}

pub struct EventHandler<S> {
    tx: mpsc::UnboundedSender<Event<S>>,
    rx: mpsc::UnboundedReceiver<Event<S>>,
    _task: tokio::task::JoinHandle<()>,
}

impl<S: HostSources + Send + 'static> EventHandler<S> {
    /// Starts the timers. `Startup` fires once after [`STARTUP_DELAY`]; the
    /// clock and metrics timers only start counting after it.
    pub fn new(read_terminal: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event<S>>();
        let timer_tx = tx.clone();

        let task = tokio::spawn(async move {
            let tx = timer_tx;
            let mut reader = read_terminal.then(EventStream::new);
            let origin = Instant::now() + STARTUP_DELAY;
            let startup = sleep(STARTUP_DELAY);
            tokio::pin!(startup);
            let mut started = false;
            let mut clock_interval = interval_at(origin + CLOCK_PERIOD, CLOCK_PERIOD);
            let mut metrics_interval = interval_at(origin + METRICS_PERIOD, METRICS_PERIOD);
            metrics_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    () = &mut startup, if !started => {
                        started = true;
                        if tx.send(Event::Startup).is_err() {
                            break;
                        }
                    }
                    _ = clock_interval.tick() => {
                        if tx.send(Event::Clock).is_err() {
                            break;
                        }
                    }
                    _ = metrics_interval.tick() => {
                        if tx.send(Event::Metrics).is_err() {
                            break;
                        }
                    }
                    maybe_event = next_terminal_event(&mut reader) => {
                        match maybe_event {
                            Some(Ok(evt)) => {
                                let mapped = match evt {
                                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                                    _ => None,
                                };
                                if let Some(e) = mapped
                                    && tx.send(e).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                }
            }
        });

        Self {
            tx,
            rx,
            _task: task,
        }
    }

    pub async fn next(&mut self) -> Option<Event<S>> {
        self.rx.recv().await
    }

    /// Runs a slow cycle on the blocking pool and posts the result back as
    /// [`Event::MetricsReady`], so it is applied on the event-loop thread.
    /// A panicking extractor yields [`Event::MetricsFailed`] instead, so the
    /// collector always returns.
    pub fn spawn_metrics_cycle(&self, mut collector: Collector<S>) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| collector.metrics_cycle()));
            let event = match outcome {
                Ok(update) => Event::MetricsReady(Box::new(MetricsCycle { collector, update })),
                Err(_) => {
                    warn!("metrics cycle panicked, keeping previous snapshot");
                    Event::MetricsFailed(Box::new(collector))
                }
            };
            let _ = tx.send(event);
        });
    }
}

async fn next_terminal_event(
    reader: &mut Option<EventStream>,
) -> Option<io::Result<CrosstermEvent>> {
    match reader {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

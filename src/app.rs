use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::event::Event;
use crate::system::HostSources;
use crate::system::collector::Collector;
use crate::system::notify::Change;
use crate::system::poller::Poller;
use crate::system::snapshot::Snapshot;

/// Front-end state: the poller plus one subscription to its changes.
pub struct App<S> {
    pub running: bool,
    poller: Poller<S>,
    changes: mpsc::UnboundedReceiver<Change>,
}

impl<S: HostSources> App<S> {
    pub fn new(mut poller: Poller<S>) -> Self {
        let changes = poller.subscribe();
        App {
            running: true,
            poller,
            changes,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.poller.snapshot()
    }

    pub fn poller(&self) -> &Poller<S> {
        &self.poller
    }

    /// Applies one event. Returns a collector when a slow cycle is due and
    /// should be run off this thread.
    pub fn handle_event(&mut self, event: Event<S>) -> Option<Collector<S>> {
        match event {
            Event::Key(key) => {
                self.on_key(key);
                None
            }
            Event::Resize => None,
            Event::Startup => {
                self.poller.startup();
                None
            }
            Event::Clock => {
                self.poller.tick_clock();
                None
            }
            Event::Metrics if self.poller.is_started() => self.poller.begin_metrics_cycle(),
            Event::Metrics => None,
            Event::MetricsReady(cycle) => {
                let cycle = *cycle;
                self.poller.finish_metrics_cycle(cycle.collector, cycle.update);
                None
            }
            Event::MetricsFailed(collector) => {
                self.poller.abandon_metrics_cycle(*collector);
                None
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let quit = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => true,
            KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        };
        if quit {
            self.running = false;
        }
    }

    /// Drains pending change notifications.
    pub fn take_changes(&mut self) -> Vec<Change> {
        let mut changes = Vec::new();
        while let Ok(change) = self.changes.try_recv() {
            changes.push(change);
        }
        changes
    }
}

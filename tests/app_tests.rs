mod common;

use std::time::Duration;

use common::FakeHost;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use sysdash::app::App;
use sysdash::event::{Event, EventHandler, MetricsCycle};
use sysdash::system::collector::Collector;
use sysdash::system::notify::Change;
use sysdash::system::poller::Poller;

fn app() -> App<FakeHost> {
    App::new(Poller::new(Collector::new(FakeHost::new()), "%H:%M"))
}

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

#[test]
fn quit_keys_stop_the_app() {
    for key in [
        press(KeyCode::Char('q'), KeyModifiers::NONE),
        press(KeyCode::Esc, KeyModifiers::NONE),
        press(KeyCode::Char('c'), KeyModifiers::CONTROL),
    ] {
        let mut app = app();
        app.on_key(key);
        assert!(!app.running, "{key:?} should quit");
    }
}

#[test]
fn other_keys_and_releases_are_ignored() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('c'), KeyModifiers::NONE));
    app.on_key(press(KeyCode::Char('x'), KeyModifiers::NONE));
    let mut release = press(KeyCode::Char('q'), KeyModifiers::NONE);
    release.kind = KeyEventKind::Release;
    app.on_key(release);
    assert!(app.running);
}

#[test]
fn metrics_tick_before_startup_is_ignored() {
    let mut app = app();
    assert!(app.handle_event(Event::Metrics).is_none());
    assert!(app.take_changes().is_empty());
}

#[test]
fn startup_then_off_thread_cycle_round_trip() {
    let mut app = app();

    assert!(app.handle_event(Event::Startup).is_none());
    assert_eq!(app.take_changes(), vec![Change::Metrics]);

    let mut collector = app.handle_event(Event::Metrics).expect("cycle due");
    assert!(app.handle_event(Event::Metrics).is_none());

    app.handle_event(Event::Clock);
    assert_eq!(app.take_changes(), vec![Change::Clock]);

    let update = collector.metrics_cycle();
    app.handle_event(Event::MetricsReady(Box::new(MetricsCycle { collector, update })));
    assert_eq!(app.take_changes(), vec![Change::Metrics]);
    assert!(!app.poller().cycle_in_flight());
    assert_eq!(app.snapshot().network(), "Intel(R) Ethernet, Wi-Fi 6 AX201");
}

#[tokio::test(start_paused = true)]
async fn scheduler_defers_startup_then_runs_both_timers() {
    let mut events: EventHandler<FakeHost> = EventHandler::new(false);

    let mut seen = Vec::new();
    while seen.len() < 7 {
        let event = events.next().await.expect("timer task alive");
        seen.push(match event {
            Event::Startup => "startup",
            Event::Clock => "clock",
            Event::Metrics => "metrics",
            _ => "other",
        });
    }

    assert_eq!(
        seen,
        vec!["startup", "clock", "clock", "clock", "clock", "clock", "metrics"]
    );
}

#[tokio::test]
async fn spawned_cycle_comes_back_as_an_event() {
    let mut events: EventHandler<FakeHost> = EventHandler::new(false);
    let host = FakeHost::new();
    let log = host.log.clone();

    events.spawn_metrics_cycle(Collector::new(host));

    let cycle = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            if let Some(Event::MetricsReady(cycle)) = events.next().await {
                return cycle;
            }
        }
    })
    .await
    .expect("cycle finished");

    assert_eq!(
        log.take(),
        vec!["volumes", "cpu", "memory", "storage", "network"]
    );
    assert_eq!(cycle.update.volumes.len(), 2);
}

#[tokio::test]
async fn panicking_cycle_returns_the_collector() {
    let mut host = FakeHost::new();
    host.adapters_panic = true;
    let mut app = App::new(Poller::new(Collector::new(host), "%H:%M"));
    let mut events: EventHandler<FakeHost> = EventHandler::new(false);

    app.handle_event(Event::Startup);
    app.take_changes();
    let collector = app.handle_event(Event::Metrics).expect("cycle due");
    assert!(app.poller().cycle_in_flight());

    events.spawn_metrics_cycle(collector);
    let failed = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            match events.next().await {
                Some(event @ Event::MetricsFailed(_)) => return event,
                Some(Event::MetricsReady(_)) => panic!("cycle should not complete"),
                _ => {}
            }
        }
    })
    .await
    .expect("collector returned");

    assert!(app.handle_event(failed).is_none());
    assert!(!app.poller().cycle_in_flight());
    assert!(app.take_changes().is_empty());
    assert!(app.handle_event(Event::Metrics).is_some());
}

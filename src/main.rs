use std::io::{Write, stdout};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use tracing::info;

use sysdash::app::App;
use sysdash::config::{Config, load_config, load_config_from_path};
use sysdash::event::{Event, EventHandler};
use sysdash::logging::init_logging;
use sysdash::system::collector::Collector;
use sysdash::system::notify::Change;
use sysdash::system::platform::Host;
use sysdash::system::poller::{Poller, STARTUP_DELAY};
use sysdash::system::snapshot::Snapshot;
use sysdash::ui;
use sysdash::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "sysdash",
    about = "Terminal dashboard for host identity, load, volumes, storage and network"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run without the terminal UI, printing one JSON line per metrics update.
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Take one full reading, print it as JSON and exit.
    #[arg(long, default_value_t = false)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    init_logging(&config.logging, cli.headless || cli.once)?;

    let collector = Collector::new(Host::new()).with_shell_override(config.general.shell.clone());
    let poller = Poller::new(collector, config.general.clock_format.clone());
    info!(headless = cli.headless, once = cli.once, "starting");

    if cli.once {
        return run_once(poller).await;
    }
    if cli.headless {
        return run_headless(poller).await;
    }

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, poller).await;
    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, poller: Poller<Host>) -> Result<()> {
    let theme = Theme::default();
    let mut app = App::new(poller);
    let mut events = EventHandler::new(true);

    terminal.draw(|frame| ui::draw(frame, app.snapshot(), &theme))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        let input = matches!(event, Event::Key(_) | Event::Resize);
        if let Some(collector) = app.handle_event(event) {
            events.spawn_metrics_cycle(collector);
        }
        let changed = !app.take_changes().is_empty();
        if app.running && (changed || input) {
            terminal.draw(|frame| ui::draw(frame, app.snapshot(), &theme))?;
        }
    }

    Ok(())
}

async fn run_headless(poller: Poller<Host>) -> Result<()> {
    let mut app = App::new(poller);
    let mut events = EventHandler::new(false);

    while let Some(event) = events.next().await {
        if let Some(collector) = app.handle_event(event) {
            events.spawn_metrics_cycle(collector);
        }
        for change in app.take_changes() {
            if change == Change::Metrics {
                print_snapshot(app.snapshot())?;
            }
        }
    }

    Ok(())
}

async fn run_once(mut poller: Poller<Host>) -> Result<()> {
    tokio::time::sleep(STARTUP_DELAY).await;
    poller.startup();
    // The first cycle only seeds the CPU tracker.
    poller.refresh_metrics();
    tokio::time::sleep(STARTUP_DELAY).await;
    poller.refresh_metrics();
    print_snapshot(poller.snapshot())
}

fn print_snapshot(snapshot: &Snapshot) -> Result<()> {
    let line = serde_json::to_string(snapshot)?;
    let mut out = stdout().lock();
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(path) = &cli.log_file {
        config.logging.file = Some(path.clone());
    }

    config
}

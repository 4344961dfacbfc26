mod action;
mod app;
mod cli;
mod config;
mod error;
mod event;
mod feed;
mod github;
mod scroll;
mod source;
mod theme;
mod tui;
mod types;
mod ui;

use std::fs::File;
use std::panic;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::cli::Cli;
use crate::config::Config;
use crate::event::Event;
use crate::github::GitHub;
use crate::tui::EventHandler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging. The terminal belongs to the UI, so logs go to a file.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_ansi(false);
    match open_log_file() {
        Some(file) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.with_writer(Mutex::new(file)))
            .init(),
        None => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.with_writer(std::io::sink))
            .init(),
    }

    let config = cli.load_config()?;
    config.validate()?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let github = GitHub::new(&config.repo)?;
    tracing::info!(repo = ?github, "starting issue feed");

    // Run the application
    let result = run(config, Arc::new(github)).await;

    // Restore terminal
    tui::restore()?;

    result
}

/// `issuefeed.log` under the user cache directory
fn open_log_file() -> Option<File> {
    let dir = dirs::cache_dir()?.join("issuefeed");
    std::fs::create_dir_all(&dir).ok()?;
    File::create(dir.join("issuefeed.log")).ok()
}

async fn run(config: Config, github: Arc<GitHub>) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state
    let mut app = App::new(&config, github, action_tx.clone());
    let size = terminal.size()?;
    app.update(Action::Resize(size.width, size.height));

    // Create event handler
    let tick_rate = Duration::from_millis(100);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        if app.take_dirty() {
                            terminal.draw(|frame| ui::render(frame, &app))?;
                        }
                    }
                    Event::Resize(..) => {
                        app.update(app.handle_event(event));
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

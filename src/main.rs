mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::FeedConfig;
use controller::FeedController;
use model::{
    FeedContext, FeedScreen, IdentityProvider, JsonFileStore, LikeStateSync, SimulatedResolver,
    StaticIdentity,
};
use view::FeedView;

const INPUT_POLL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Clip Feed Starting ===");

    let config = FeedConfig::load()?;
    tracing::debug!(?config, "Configuration resolved");

    let clips = model::load_feed(&config.feed_path, config.event.as_deref())
        .with_context(|| format!("Could not load feed from {}", config.feed_path.display()))?;

    let identity: Arc<dyn IdentityProvider> = Arc::new(StaticIdentity::new(config.user.clone()));
    let user_key = identity.current_user_key();

    let store = JsonFileStore::open(&config.store_path)
        .await?
        .with_latency(config.store_latency());
    tracing::info!(path = ?store.path(), "Like store opened");

    // First run: the signed-in user needs a record before likes can sync
    let ensured = store.ensure_user(&user_key).await;
    log_result!("ensure_user", ensured);

    let (events_tx, events_rx) = model::channel();
    let context = FeedContext {
        resolver: Arc::new(SimulatedResolver::new(config.clip_duration(), config.tick())),
        likes: Arc::new(LikeStateSync::new(Arc::new(store))),
        identity,
        events: events_tx,
    };

    let title = config
        .event
        .clone()
        .unwrap_or_else(|| "All events".to_string());
    let screen = Arc::new(FeedScreen::new());
    let mut controller = FeedController::new(
        clips,
        config.cell_pool_size,
        context,
        events_rx,
        screen,
        title,
    );
    controller.scroll_to(0);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut controller).await;

    // Sessions must stop before the runtime goes away
    controller.release_all();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Clip Feed shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut FeedController,
) -> Result<()> {
    loop {
        // Background completions are applied here, on the UI context
        controller.drain_events();

        let screen = controller.screen().clone();
        screen.auto_clear_old_errors();

        let snapshot = controller.snapshot();
        let ui_state = screen.ui_state();

        terminal.draw(|f| {
            FeedView::render(f, &snapshot, &ui_state);
        })?;

        if screen.should_quit() {
            break;
        }

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key) {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        // Let session watchers and sync tasks make progress between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}

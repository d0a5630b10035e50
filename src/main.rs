// Main entry point - Dependency injection and board startup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::application::layout_service::RandomPhase;
use crate::application::position_source::WatchOptions;
use crate::application::render_loop;
use crate::application::server_gateway::ServerGateway;
use crate::application::session_service::Session;
use crate::infrastructure::config::{load_board_config, load_client_config};
use crate::infrastructure::geo_file::FilePositionSource;
use crate::infrastructure::http_gateway::HttpGateway;
use crate::presentation::board_view::{SharedView, ViewState};
use crate::presentation::painter::CanvasPainter;
use crate::presentation::term::{pump_input, TermGuard, TermScreen};

const DEFAULT_POSITION_FILE: &str = "position.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Frames own stdout, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let client_config = load_client_config()?;
    let board_config = load_board_config()?;

    // Infrastructure adapters
    let gateway = Arc::new(HttpGateway::new(client_config.server.base_url.clone()));
    let position_file = client_config
        .tracking
        .position_file
        .clone()
        .unwrap_or_else(|| DEFAULT_POSITION_FILE.to_string());
    let source = Arc::new(FilePositionSource::new(
        PathBuf::from(position_file),
        Duration::from_secs(client_config.tracking.poll_interval_secs),
    ));

    // Shared view state between the session and the screen
    let state = Arc::new(Mutex::new(ViewState::default()));
    let view = Arc::new(SharedView::new(state.clone()));

    let (events_tx, events_rx) = mpsc::channel(64);
    let min_send_interval = Duration::from_secs(client_config.tracking.min_send_interval_secs);
    let watch_options = WatchOptions {
        timeout: Duration::from_secs(client_config.tracking.watch_timeout_secs),
        maximum_age: min_send_interval,
    };
    let session = Session::new(
        gateway.clone(),
        source,
        view,
        Box::new(RandomPhase(StdRng::from_entropy())),
        client_config.server.user_id,
        min_send_interval,
        watch_options,
        events_tx.clone(),
    );
    let figures = session.figures();

    println!(
        "Starting presence-board against {}",
        client_config.server.base_url
    );

    // Live connection: pump server events into the session stream
    let server_rx = gateway.subscribe().await?;
    let server_tx = events_tx.clone();
    tokio::spawn(async move {
        let mut server_rx = server_rx;
        while let Some(event) = server_rx.recv().await {
            if server_tx.send(event.into()).await.is_err() {
                return;
            }
        }
    });

    // Terminal: render loop plus input pump (focus regain, quit)
    let guard = TermGuard::enter()?;
    let screen = TermScreen::new(
        (board_config.canvas_width, board_config.canvas_height),
        Duration::from_secs(board_config.notice_ttl_secs),
        state,
    );
    let render = tokio::spawn(render_loop::run(
        Box::new(CanvasPainter::new(screen)),
        figures,
        Duration::from_millis(board_config.frame_period_ms),
    ));
    tokio::spawn(pump_input(events_tx.clone()));
    drop(events_tx);

    session.run(ReceiverStream::new(events_rx)).await;

    render.await?;
    drop(guard);
    Ok(())
}

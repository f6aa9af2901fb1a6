use axum::{routing::get, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use mazelib::SessionRegistry;

mod handlers;

/// Daedalus builds labyrinths and serves them to icarus clients, one room
/// survey at a time.
#[derive(Parser, Debug, Clone)]
#[command(name = "daedalus")]
#[command(about = "Start the labyrinth creator")]
pub struct Args {
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Maze width in rooms
    #[arg(long, default_value = "15")]
    pub width: usize,

    /// Maze height in rooms
    #[arg(long, default_value = "10")]
    pub height: usize,

    /// Probability of braiding away each dead end, 0.0 to 1.0
    #[arg(long, default_value = "0.0")]
    pub braid: f64,

    /// Render every maze state to the log
    #[arg(long)]
    pub debug: bool,
}

pub struct AppState {
    pub registry: Mutex<SessionRegistry>,
    pub config: Args,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let port = args.port;
    let state = Arc::new(AppState {
        registry: Mutex::new(SessionRegistry::new()),
        config: args,
    });

    // Report the aggregate results even when the operator kills the server.
    let state_for_signal = state.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let stats = state_for_signal.registry.lock().await.stats();
            println!(
                "Labyrinth solved {} times with an avg of {} steps",
                stats.sessions_solved, stats.average_steps
            );
            std::process::exit(1);
        }
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/awake", get(handlers::awake))
        .route("/move/{direction}", get(handlers::move_direction))
        .route("/discover/{x}/{y}", get(handlers::discover))
        .route("/done", get(handlers::done))
        .with_state(state)
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("daedalus listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

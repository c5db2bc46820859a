use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use onboard_flow::cli::{self, Command};
use onboard_flow::config::EngineConfig;
use onboard_flow::routes::flow_routes;
use onboard_flow::session::FlowSession;
use onboard_flow::variant::{AbTestStore, JsonFileStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = EngineConfig::from_env()?;

    let storage = JsonFileStorage::new(&config.storage_dir);
    let ab_test = AbTestStore::open(Box::new(storage));
    let session = Arc::new(RwLock::new(FlowSession::new(ab_test)));

    {
        let s = session.read().await;
        eprintln!("Onboarding Flow v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("   Variant: {} ({} steps)", s.current_version(), s.flow().total_steps());
        eprintln!("   Storage: {}", config.storage_dir.display());
    }

    // ── REST server ─────────────────────────────────────────────────────
    if config.serve_http {
        let port = config.port;
        let app = flow_routes(Arc::clone(&session)).layer(CorsLayer::permissive());
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        eprintln!("   Flow API: http://0.0.0.0:{port}/api/flow/status");
        tokio::spawn(async move {
            tracing::info!(port, "Flow REST server started");
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Flow REST server stopped: {}", e);
            }
        });
    }

    eprintln!("   Type 'help' for commands, 'quit' to exit.\n");

    // ── REPL ────────────────────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                let output = cli::execute(&mut *session.write().await, command);
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Err(e) => eprintln!("{e}"),
        }
        eprint!("> ");
    }

    Ok(())
}

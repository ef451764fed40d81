// Vigil console entry point
//
// Decision: Use clap derive for ergonomic argument parsing.
// Decision: Local mode wires the in-memory engine and store; a remote
// engine plugs in behind the same gateway trait.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use vigil_console::app::App;
use vigil_console::config::ConsoleConfig;
use vigil_console::frontend::{parse_line, HELP};
use vigil_console::render::AnsiRenderer;
use vigil_console::workflows::register_workflows;
use vigil_gateway::InMemoryEngine;
use vigil_store::{InMemoryStore, NewReport, ReportStore};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil - operator console for security workflows")]
#[command(version)]
struct Cli {
    /// Target width for rendered output
    #[arg(long, env = "VIGIL_WIDTH")]
    width: Option<usize>,

    /// Seed the store with demo reports
    #[arg(long, env = "VIGIL_SEED_DEMO")]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil_console=info,vigil_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = ConsoleConfig::from_env();
    if let Some(width) = cli.width {
        config.width = width;
    }
    config.seed_demo |= cli.seed_demo;

    tracing::info!(width = config.width, "vigil starting...");

    let store = Arc::new(InMemoryStore::new());
    if config.seed_demo {
        seed_demo_reports(store.as_ref()).await?;
        tracing::info!(reports = store.report_count(), "seeded demo reports");
    }

    let engine = Arc::new(InMemoryEngine::new());
    register_workflows(&engine, Arc::clone(&store) as Arc<dyn ReportStore>);

    let app = App::new(engine, store, Arc::new(AnsiRenderer), &config);

    let (action_tx, action_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_line(&line) {
                Some(action) => {
                    if action_tx.send(action).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => println!("{HELP}"),
            }
        }
    });

    println!("{HELP}");
    app.run(action_rx).await;

    tracing::info!("vigil shutdown complete");
    Ok(())
}

async fn seed_demo_reports(store: &InMemoryStore) -> Result<()> {
    let reports = [
        NewReport {
            title: "SQL injection in login form".to_string(),
            severity: "high".to_string(),
            body: "# SQL injection\n\nThe login form concatenates user input into a query."
                .to_string(),
        },
        NewReport {
            title: "Outdated TLS configuration".to_string(),
            severity: "medium".to_string(),
            body: "# Outdated TLS\n\nThe edge proxy still accepts TLS 1.0 handshakes.".to_string(),
        },
        NewReport {
            title: "Verbose server banner".to_string(),
            severity: "low".to_string(),
            body: "# Verbose banner\n\nResponses leak the exact server version.".to_string(),
        },
    ];
    for report in reports {
        store.add_report(report).await?;
    }
    Ok(())
}

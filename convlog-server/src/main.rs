use clap::Parser;
use convlog_core::{ConvlogConfig, LogStore};
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use convlog_server::http;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Init logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Load config
    let config = match ConvlogConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from environment: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to DB
    let pool = match convlog_core::db::create_pool(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if args.health {
        match convlog_core::db::health_check(&pool).await {
            Ok(v) => println!("✅ PostgreSQL connected: {}", v),
            Err(e) => {
                println!("❌ PostgreSQL connection failed: {}", e);
                std::process::exit(1);
            }
        }

        println!("✅ Conversation log DB health check passed");
        return Ok(());
    }

    // Table and indexes are created at startup if absent — no migration tooling
    convlog_core::db::init_schema(&pool).await?;
    let store = LogStore::new(pool);

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    http::start_http_server(store, config, tx.subscribe()).await?;

    Ok(())
}

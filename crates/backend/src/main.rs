use axum::http::{header, Method};
use backend::diagnostics::Diagnostics;
use backend::processors::ProcessorRegistry;
use backend::routes::{self, AppState};
use backend::shared::config::{self, ConfigError};
use backend::shared::data::db;
use backend::shared::host::AppContext;
use backend::system;
use clap::{Parser, Subcommand};
use contracts::shared::processor::ConnectorError;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

const CONFIG_ENV: &str = "EXTRAFIELDS_CONFIG";

#[derive(Parser, Debug)]
#[command(name = "extrafields", version, about = "Custom per-resource text fields")]
struct Cli {
    /// Path to config.toml (overrides EXTRAFIELDS_CONFIG and the search)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Run diagnostics once, print the report as JSON and exit
    Diagnostics,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    system::tracing::initialize()?;

    let explicit = cli
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let config = match config::discover_config(explicit.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let db_url = config.database_url();
    let conn = match db::initialize_database(&db_url).await {
        Ok(conn) => conn,
        Err(e) => exit_with(&ConfigError::Database(e.to_string())),
    };

    let ctx = Arc::new(AppContext::from_config(config, conn));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(ctx).await,
        Command::Diagnostics => {
            let registry = ProcessorRegistry::with_defaults();
            let report = Diagnostics::new(&*ctx, &registry).run().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.ok {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

async fn serve(ctx: Arc<AppContext>) -> anyhow::Result<()> {
    let addr = ctx.config().server_addr();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(AppState::with_defaults(ctx)).layer(cors);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("ExtraFields listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Startup failures are reported as a connector-style JSON envelope on stdout
fn exit_with(err: &ConfigError) -> ! {
    tracing::error!("{}", err);
    let body = ConnectorError::new(err.code(), err.to_string());
    match serde_json::to_string(&body) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{{\"success\":false,\"error\":\"{}\"}}", err.code()),
    }
    std::process::exit(1);
}

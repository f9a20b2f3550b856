//! Demo server for the request logging middleware.
//!
//! ```text
//! GET /greeting        writer-style handler wrapped with `wrap`
//! GET /status/{code}   axum handler behind `HttpLogLayer`
//! ```
//!
//! Request logs go to stdout (JSON lines) or through tracing; the server's
//! own diagnostics go to stderr.

use clap::{Parser, ValueEnum};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use httplog::config::HttpLogConfig;
use httplog::http::HttpServer;
use httplog::observability::{json_stdio, structured_from_config, LogFn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// JSON lines on stdout/stderr
    Json,
    /// Structured tracing events
    Structured,
    /// Both, JSON first
    Both,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Parser)]
#[command(name = "httplog")]
#[command(about = "Demo HTTP server with request logging", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// How request logs are emitted
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Output format for the server's own diagnostics
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "httplog=debug,tower_http=info".into());
    match cli.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    tracing::info!("httplog v{} starting", env!("CARGO_PKG_VERSION"));

    let config = HttpLogConfig::default();

    // Only the structured strategy reads the level variable.
    let log_fns: Vec<LogFn> = match cli.format {
        Format::Json => Vec::new(),
        Format::Structured => vec![structured_from_config(&config)],
        Format::Both => vec![json_stdio(), structured_from_config(&config)],
    };

    tracing::info!(
        format = ?cli.format,
        level_env_var = %config.level_env_var,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&cli.bind).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, log_fns);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

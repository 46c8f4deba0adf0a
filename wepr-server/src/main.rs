use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wepr::{AnalysisConfig, Client};
use wepr_server::{bind, router, AppState};

#[derive(Parser)]
#[command(name = "wepr-server")]
#[command(version, about = "Run the WEPR backend", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to run the server on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Ollama base URL (default: OLLAMA_HOST or http://localhost:11434)
    #[arg(long)]
    ollama_url: Option<String>,

    /// Request timeout towards Ollama, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Compact,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    let client = build_client(&cli)?;
    let analysis = AnalysisConfig::from_env()?;
    info!(
        ollama = %client.config().base_url,
        high_threshold = analysis.high_threshold,
        medium_threshold = analysis.medium_threshold,
        epr_risk_divisor = analysis.epr_risk_divisor,
        "configuration loaded"
    );

    let app = router(AppState::new(client, analysis));
    let listener = bind(&cli.host, cli.port).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "WEPR backend listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_client(cli: &Cli) -> wepr::Result<Client> {
    let mut builder = Client::builder().with_env();
    if let Some(url) = cli.ollama_url.as_deref() {
        builder = builder.base_url(url);
    }
    if let Some(timeout) = cli.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,reqwest=warn")));

    match format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }
}

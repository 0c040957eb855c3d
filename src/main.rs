//! powerfox-exporter binary.
//!
//! Thin process plumbing around the library: flag parsing, logging setup and
//! the metrics-server startup. All protocol logic lives in the library.

use clap::Parser;
use powerfox_exporter::{start_web_server, MeterCollector, WebConfig, DEFAULT_LISTEN_PORT};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "powerfox_exporter")]
#[command(about = "Prometheus exporter for powerfox smart-meter devices")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Metrics server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Metrics server port
    #[arg(short, long, default_value_t = DEFAULT_LISTEN_PORT)]
    port: u16,

    /// Device address to poll (repeatable)
    #[arg(short, long = "device", required = true)]
    device: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    info!("Starting powerfox exporter...");
    info!("Configured devices: {}", cli.device.join(", "));

    let collector = MeterCollector::new(cli.device.clone());
    let config = WebConfig::new(&cli.host, cli.port);

    start_web_server(config, collector).await?;

    info!("Exporter stopped");
    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kiteforecast::config::LoggingConfig;
use kiteforecast::{HttpConditionsProvider, KiteConfig, KiteForecastService, report, web};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Daily kite-surfing go/no-go forecast for Reschensee
#[derive(Parser)]
#[command(name = "kiteforecast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "KITEFORECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the forecast to the terminal (default)
    Report,

    /// Serve the forecast as an HTML page
    Serve {
        /// Port to listen on (overrides web.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn init_logging(logging: &LoggingConfig, verbose: u8) {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over config and flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli, config: KiteConfig) -> kiteforecast::Result<()> {
    let provider = HttpConditionsProvider::new(config.clone())?;
    let service = KiteForecastService::new(provider, config.clone());

    match cli.command.unwrap_or(Commands::Report) {
        Commands::Report => {
            let report = service.generate_report().await?;
            print!("{}", report::render_report(&report));
        }
        Commands::Serve { port } => {
            let mut web_config = config.web;
            if let Some(port) = port {
                web_config.port = port;
            }
            web::run(service, &web_config).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match KiteConfig::load_from_path(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e:#}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging, cli.verbose);
    info!("kiteforecast {} starting", kiteforecast::VERSION);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, fatal = e.is_fatal(), "Run failed");
            eprintln!("❌ {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

use amplitude_server::{run_server, MusicLibrary, RequestsLoggingLevel, ServerConfig};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Music library directory to select at startup. Can also be set later
    /// through the set_music_folder endpoint.
    #[clap(long)]
    pub music_folder: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let library = match cli_args.music_folder {
        Some(path) => {
            let library = MusicLibrary::open(&path)
                .with_context(|| format!("Invalid music folder: {}", path.display()))?;
            info!("Music folder preselected: {}", library.root().display());
            Some(library)
        }
        None => None,
    };

    let config = ServerConfig {
        requests_logging_level: cli_args.logging_level,
        port: cli_args.port,
    };

    info!("Ready to serve at port {}!", config.port);
    run_server(config, library).await
}

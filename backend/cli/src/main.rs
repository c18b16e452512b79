mod app;
mod config_cmd;
mod recognize_cmd;
mod remote;
mod terminal_output;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use textlift_config::{
    config_dir, config_file_path, load_and_prepare, log_report, validate, TextliftConfig,
};
use textlift_core::OutputMode;
use textlift_gateway::{start_server, GatewayState};

use recognize_cmd::RecognizeArgs;
use terminal_output::note_error;

#[derive(Parser)]
#[command(name = "textlift")]
#[command(about = "TextLift: extract text from images with a hosted vision model")]
#[command(version)]
struct Cli {
    /// Config file (default: $TEXTLIFT_CONFIG_DIR/config.yaml or ~/.textlift/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Recognize text in an image file (`-` reads stdin)
    Recognize {
        /// Image path, `-` for stdin, or a `data:` URL
        input: String,
        /// Output mode: text or json
        #[arg(short, long)]
        mode: Option<OutputMode>,
        /// Declared mime type when the bytes are not a recognized format
        #[arg(long)]
        mime: Option<String>,
        /// Print the full result object as JSON
        #[arg(long)]
        json_output: bool,
    },
    /// Reset the session marker of a running server
    Reset {
        /// Server URL (default: from config)
        #[arg(long)]
        url: Option<String>,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show whether a server is running
    Status {
        /// Server URL (default: from config)
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved config with secrets masked
    Show,
    /// Validate the config and list problems
    Validate,
    /// Write a starter config file
    Init {
        /// Replace an existing file (the old one is kept as .bak)
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        note_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    if let Commands::Config {
        action: ConfigAction::Init { force },
    } = cli.command
    {
        return config_cmd::init(&path, force).await;
    }

    let config = load_and_prepare(&path).await?;
    textlift_logging::init_logger(&app::log_options(&config, cli.verbose));
    log_report(&validate(&config));

    match cli.command {
        Commands::Serve { port, bind } => run_server(config, port, bind).await,
        Commands::Recognize {
            input,
            mode,
            mime,
            json_output,
        } => {
            let args = RecognizeArgs {
                input,
                mode,
                mime,
                json_output,
            };
            recognize_cmd::run(&config, args).await
        }
        Commands::Reset { url } => remote::reset(&remote::server_url(&config, url.as_deref())).await,
        Commands::Status { url } => remote::status(&remote::server_url(&config, url.as_deref())).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(&config),
            ConfigAction::Validate => config_cmd::validate_cmd(&config, &path),
            ConfigAction::Init { .. } => Ok(()),
        },
    }
}

async fn run_server(config: TextliftConfig, port: Option<u16>, bind: Option<String>) -> Result<()> {
    let port = port.unwrap_or(config.port());
    let bind = bind.unwrap_or_else(|| config.bind().to_string());
    let addr = format!("{bind}:{port}")
        .parse::<SocketAddr>()
        .or_else(|_| format!("[{bind}]:{port}").parse::<SocketAddr>())
        .with_context(|| format!("Invalid bind address '{bind}'"))?;

    let client = app::build_client(&config)?;
    let state = GatewayState::new(client, app::default_mode(&config)?, config.max_body_bytes());

    info!(%addr, max_body_bytes = config.max_body_bytes(), "Starting TextLift gateway");
    start_server(addr, state).await
}

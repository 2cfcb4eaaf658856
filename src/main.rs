use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mcserver::commands;
use mcserver::core::{config::Config, registry::ServerManager};

const DEFAULT_VERSION_LIMIT: usize = 20;

#[derive(Parser)]
#[clap(name = "mcserver")]
#[clap(about = "Minecraft server jar downloader")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Show debug logging (HTTP requests and resolution steps)
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported server software
    Families,
    /// List available versions for a server software
    Versions {
        /// Server software (e.g., vanilla, paper)
        software: String,
        /// List every version instead of the newest ones
        #[clap(long)]
        all: bool,
    },
    /// Print the download URL of a server jar
    Url {
        /// Server software (e.g., vanilla, paper)
        software: String,
        /// Version to resolve (e.g., 1.20.1)
        version: String,
    },
    /// Download a server jar
    Download {
        /// Server software (e.g., vanilla, paper)
        software: String,
        /// Version to download; prompts for one when omitted
        version: Option<String>,
        /// Destination file (default: <servers_dir>/<software>/<version>/server.jar)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Families => {
            commands::list::list_families();
            Ok(())
        }
        Commands::Versions { software, all } => {
            let (_, manager) = load_manager()?;
            let limit = (!all).then_some(DEFAULT_VERSION_LIMIT);
            commands::available::list_available_versions(&manager, &software, limit)
        }
        Commands::Url { software, version } => {
            let (_, manager) = load_manager()?;
            commands::download::print_download_url(&manager, &software, &version)
        }
        Commands::Download {
            software,
            version,
            output,
        } => {
            let (config, manager) = load_manager()?;
            commands::download::download_server(
                &manager,
                &config,
                &software,
                version.as_deref(),
                output,
            )
        }
    }
}

fn load_manager() -> Result<(Config, ServerManager)> {
    let config = Config::load()?;
    let manager = ServerManager::from_config(&config)?;
    Ok((config, manager))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use title_critic::cli::{self, ServiceOverrides};
use title_critic::core::EvaluationMode;
use title_critic::telemetry;

#[derive(Parser)]
#[command(name = "title-critic")]
#[command(author, version, about = "Submit a title to the evaluation service and read its critique", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct ServiceArgs {
    /// Override the evaluation service base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl From<ServiceArgs> for ServiceOverrides {
    fn from(args: ServiceArgs) -> Self {
        Self {
            api_url: args.api_url,
            timeout_secs: args.timeout,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single title
    Evaluate {
        /// Title to evaluate
        title: String,

        /// Evaluation mode (casual, cool, imouto, poet)
        #[arg(short, long)]
        mode: Option<EvaluationMode>,

        /// Print the formatted evaluation as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// List the available evaluation modes
    Modes,

    /// Evaluate titles typed line by line
    Interactive {
        /// Mode to start in
        #[arg(short, long)]
        mode: Option<EvaluationMode>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,

        #[command(flatten)]
        service: ServiceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init(cli.verbose);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Evaluate {
            title,
            mode,
            json,
            service,
        } => {
            let config = cli::resolve_config(config_path, &service.into())?;
            let succeeded = cli::run_evaluate(&config, &title, mode, json).await?;
            if !succeeded {
                std::process::exit(1);
            }
        }
        Commands::Modes => {
            let config = cli::resolve_config(config_path, &ServiceOverrides::default())?;
            cli::run_modes(config.client.default_mode);
        }
        Commands::Interactive { mode, service } => {
            let config = cli::resolve_config(config_path, &service.into())?;
            tracing::info!(base_url = %config.service.base_url, "starting interactive session");
            cli::run_interactive(&config, mode).await?;
        }
        Commands::Config { save, service } => {
            let config = cli::resolve_config(config_path, &service.into())?;
            cli::run_config(&config, cli.config.clone(), save)?;
        }
    }

    Ok(())
}

mod cmd;
mod output;
mod settings;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use garaj_core::config::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "garajhub",
    about = "GarajHub admin backend: API server and bot broadcasts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the YAML config file (missing file = defaults)
    #[arg(long, global = true, env = "GARAJHUB_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// SQLite database path
    #[arg(long, global = true, env = "GARAJHUB_DB")]
    db: Option<PathBuf>,

    /// Telegram bot token
    #[arg(long, global = true, env = "BOT_TOKEN", hide_env_values = true)]
    bot_token: Option<String>,

    /// Chat id that receives delivery reports
    #[arg(long, global = true, env = "ADMIN_ID")]
    operator: Option<i64>,

    /// Bearer token required on /api/*
    #[arg(long, global = true, env = "GARAJHUB_ADMIN_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the admin API server
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },

    /// Send a broadcast now and wait for the delivery report
    Broadcast {
        /// Audience: all, startup_owners, startup_members
        #[arg(long, short = 'a', default_value = "all")]
        audience: String,

        /// Only resolve the audience; send nothing
        #[arg(long)]
        dry_run: bool,

        /// Message body (Telegram HTML allowed)
        message: String,
    },

    /// Inspect the effective configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } | Commands::Broadcast { .. } => tracing::Level::INFO,
        Commands::Config { .. } => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let overrides = settings::Overrides {
        database: cli.db,
        bot_token: cli.bot_token,
        operator_chat_id: cli.operator,
        admin_token: cli.admin_token,
    };

    let result = settings::load(&cli.config, overrides).and_then(|config| match cli.command {
        Commands::Serve { port } => cmd::serve::run(config, port),
        Commands::Broadcast {
            audience,
            dry_run,
            message,
        } => cmd::broadcast::run(config, &audience, message, dry_run, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&config, subcommand, cli.json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

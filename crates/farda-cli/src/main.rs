use clap::{Parser, Subcommand};
use farda_core::FardaConfig;
use std::path::PathBuf;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "farda", version, about = "Farda uniform-order dashboard")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "farda.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database schema and seed bootstrap accounts and schools.
    Init,

    /// Start the web dashboard.
    Serve,

    /// Manage dashboard users.
    User {
        #[command(subcommand)]
        cmd: UserCommand,
    },

    /// Print overview metrics as JSON.
    Report,

    /// Show recent audit events.
    Audit {
        /// Maximum number of events to print.
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Only events by this actor.
        #[arg(long)]
        actor: Option<String>,

        /// Only events of this kind (e.g. "order_placed", "stock_adjusted").
        #[arg(long)]
        kind: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user.
    Add {
        #[arg(long)]
        username: String,

        /// Password; prefer passing it via the env var.
        #[arg(long, env = "FARDA_NEW_USER_PASSWORD")]
        password: String,

        #[arg(long)]
        display_name: String,

        /// "admin" or "vendor".
        #[arg(long, default_value = "vendor")]
        role: String,
    },

    /// List users.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.cmd {
        Command::Init => commands::init::run(&config).await?,
        Command::Serve => commands::serve::run(config).await?,
        Command::User { cmd } => match cmd {
            UserCommand::Add {
                username,
                password,
                display_name,
                role,
            } => commands::user::add(&config, &username, &password, &display_name, &role).await?,
            UserCommand::List => commands::user::list(&config).await?,
        },
        Command::Report => commands::report::run(&config).await?,
        Command::Audit { limit, actor, kind } => {
            commands::audit::run(&config, limit, actor, kind).await?
        }
    }

    Ok(())
}

fn load_config(path: &PathBuf) -> anyhow::Result<FardaConfig> {
    if path.exists() {
        tracing::info!(config = %path.display(), "Loading configuration");
        Ok(FardaConfig::from_file(path)?)
    } else {
        tracing::warn!(
            config = %path.display(),
            "Configuration file not found, using defaults (DATABASE_URL from env)"
        );
        Ok(FardaConfig::default())
    }
}

/// Roster - find-or-create a user and age it by one year
use clap::{Parser, Subcommand};
use roster_cli::{commands, OutputFormat, RosterConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Keep a user record in the database and age it on every run", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./roster.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database URL, overrides the configuration file
    #[arg(long, global = true, env = "POSTGRES_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the users table if it does not exist
    Init,
    /// Find or create the user, then increment its age
    Reconcile {
        /// User name to look up
        #[arg(short, long)]
        name: Option<String>,
        /// Age for a newly created user
        #[arg(short, long)]
        default_age: Option<i32>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "roster_cli=info,roster_core=info,roster_storage=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = RosterConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => {
            config.apply_overrides(cli.database_url, None, None);
            config.validate()?;
            commands::init(&config.storage).await?;
        }
        Commands::Reconcile {
            name,
            default_age,
            format,
        } => {
            config.apply_overrides(cli.database_url, name, default_age);
            config.validate()?;

            let output = commands::reconcile(
                &config.storage,
                &config.reconcile.name,
                config.reconcile.default_age,
                format,
            )
            .await?;
            println!("{output}");
        }
    }

    Ok(())
}

mod account;
mod metrics;
mod search;
mod state;


use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hemaroute_core::{load_config, validate_config, BloodType};

use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "hemaroute")]
#[command(about = "Find the nearest hospital able to handle an emergency", version)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, env = "HEMAROUTE_CONFIG", default_value = "hemaroute.toml")]
    config: PathBuf,

    /// Print collected metrics to stderr before exiting
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HEMAROUTE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Create an account
    Register(RegisterArgs),
    /// Enter without an account
    Emergency,
    /// Print the effective configuration as JSON
    Config,
    /// Search for hospitals near the current location
    Search {
        #[command(subcommand)]
        query: SearchQuery,

        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        feedback: FeedbackArgs,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "HEMAROUTE_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    phone: String,

    /// Register as a thalassemia patient
    #[arg(
        long,
        requires_all = ["full_name", "age", "blood_group", "last_transfusion", "interval_days", "city"]
    )]
    thalassemia: bool,
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    age: Option<u32>,
    /// Blood group as written on the patient's records
    #[arg(long)]
    blood_group: Option<String>,
    /// Date of the last transfusion (YYYY-MM-DD)
    #[arg(long)]
    last_transfusion: Option<NaiveDate>,
    /// Days between transfusions
    #[arg(long)]
    interval_days: Option<u32>,
    #[arg(long)]
    city: Option<String>,
}

#[derive(Debug, Subcommand)]
enum SearchQuery {
    /// Describe the emergency in your own words
    Prompt { text: String },
    /// Structured search
    Form {
        #[arg(long)]
        city: String,
        /// Wire code (blood_o_pos) or label (O+)
        #[arg(long, default_value = "O+")]
        blood_type: BloodType,
        /// Emergency category, e.g. accident
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        details: String,
    },
}

/// Manual location, overriding automatic acquisition. Without it a denied
/// acquisition asks for a location on stdin.
#[derive(Debug, Default, Args)]
struct LocationArgs {
    /// Place name to look up
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    place: Option<String>,
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
}

impl LocationArgs {
    fn is_empty(&self) -> bool {
        self.place.is_none() && self.lat.is_none() && self.lon.is_none()
    }
}

#[derive(Debug, Default, Args)]
struct FeedbackArgs {
    /// Rate one of the returned hospitals by name
    #[arg(long, value_name = "HOSPITAL")]
    rate: Option<String>,
    /// Whether the recommendation was helpful
    #[arg(long, requires = "rate")]
    helpful: Option<Answer>,
    #[arg(long, requires = "rate")]
    comment: Option<String>,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Register(_) => "register",
            Commands::Emergency => "emergency",
            Commands::Config => "config",
            Commands::Search { .. } => "search",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Answer {
    Yes,
    No,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    info!("Loading configuration from {:?}", cli.config);
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    let state = AppState::new(config)?;

    let command = cli.command.name();
    let result = dispatch(&state, cli.command).await;
    metrics::record_command(command, result.is_ok());

    if cli.metrics {
        eprint!("{}", metrics::encode_metrics()?);
    }
    result
}

async fn dispatch(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => account::login(state, &email, &password).await,
        Commands::Logout => account::logout(state),
        Commands::Register(args) => account::register(state, args).await,
        Commands::Emergency => account::emergency(state).await,
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(state.config())?);
            Ok(())
        }
        Commands::Search {
            query,
            location,
            feedback,
            json,
        } => search::run(state, query, &location, &feedback, json).await,
    }
}

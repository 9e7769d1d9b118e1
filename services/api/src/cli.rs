use crate::commands::{run_discover, run_qualify};
use crate::report::OutputFormat;
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tender_sift::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "tender-sift",
    about = "Discover accessibility-works tenders and qualify them against contractor profiles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Fetch every configured jurisdiction and list open, relevant tenders
    Discover(DiscoverArgs),
    /// Rank open tenders against a capability profile read from a JSON file
    Qualify(QualifyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON array of capability profiles served by the profile store
    #[arg(long)]
    pub(crate) profiles: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DiscoverArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct QualifyArgs {
    /// Capability profile JSON file
    #[arg(long)]
    pub(crate) profile: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Leave disqualified tenders out of the output
    #[arg(long)]
    pub(crate) hide_disqualified: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Discover(args) => run_discover(args).await,
        Command::Qualify(args) => run_qualify(args).await,
    }
}

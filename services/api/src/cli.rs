use crate::commands::{run_import, run_migrate, ImportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cs_hub::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "cs-hub",
    about = "Run the Customer Success hub service or import company spreadsheets",
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
    /// Import a company CSV into the configured store and print the report
    Import(ImportArgs),
    /// Apply the database migrations
    Migrate,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Import(args) => run_import(args).await,
        Command::Migrate => run_migrate().await,
    }
}

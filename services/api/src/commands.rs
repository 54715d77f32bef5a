use crate::infra::open_repository;
use clap::Args;
use cs_hub::accounts::PgAccountRepository;
use cs_hub::config::{AppConfig, ConfigError};
use cs_hub::error::AppError;
use cs_hub::import::CompanyImporter;
use cs_hub::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV file exported from the account spreadsheet
    #[arg(long)]
    pub(crate) file: PathBuf,
}

pub(crate) async fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let bytes = std::fs::read(&args.file)?;
    info!(file = %args.file.display(), bytes = bytes.len(), "importing companies from file");

    let repository = open_repository(&config).await?;
    let importer = CompanyImporter::new(repository, config.import);
    let report = importer.import_bytes(&bytes).await?;

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Import report unavailable: {err}"),
    }
    Ok(())
}

pub(crate) async fn run_migrate() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let url = config
        .database
        .url
        .as_deref()
        .ok_or(ConfigError::MissingDatabaseUrl)?;
    let repository = PgAccountRepository::connect(url, &config.database).await?;
    repository.migrate().await?;

    info!("database migrations applied");
    Ok(())
}

use cs_hub::accounts::{AccountRepository, InMemoryAccountRepository, PgAccountRepository};
use cs_hub::auth::TokenVerifier;
use cs_hub::config::AppConfig;
use cs_hub::error::AppError;
use cs_hub::import::{CompanyImporter, CompanyRoutesState};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise a seeded in-memory store.
pub(crate) async fn open_repository(
    config: &AppConfig,
) -> Result<Arc<dyn AccountRepository>, AppError> {
    match config.database.url.as_deref() {
        Some(url) => {
            let repository = PgAccountRepository::connect(url, &config.database).await?;
            info!(
                max_connections = config.database.max_connections,
                "connected to postgres account store"
            );
            Ok(Arc::new(repository))
        }
        None => {
            warn!(
                owners = config.database.seed_owners.len(),
                teams = config.database.seed_teams.len(),
                "DATABASE_URL not set; using in-memory account store"
            );
            Ok(Arc::new(InMemoryAccountRepository::with_seed(
                config.database.seed_owners.iter().cloned(),
                config.database.seed_teams.iter().cloned(),
            )))
        }
    }
}

pub(crate) fn company_state(
    config: &AppConfig,
    repository: Arc<dyn AccountRepository>,
) -> CompanyRoutesState<dyn AccountRepository> {
    if config.auth.uses_development_secret() {
        warn!("AUTH_JWT_SECRET not set; using the development signing secret");
    }

    CompanyRoutesState {
        importer: Arc::new(CompanyImporter::new(repository, config.import)),
        verifier: Arc::new(TokenVerifier::from_secret(&config.auth.jwt_secret)),
    }
}

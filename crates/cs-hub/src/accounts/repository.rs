use async_trait::async_trait;

use super::domain::{Company, CsOwner, NewCompany, Team};

/// Storage abstraction shared by the import pipeline and the HTTP routes.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn owners(&self) -> Result<Vec<CsOwner>, RepositoryError>;
    async fn teams(&self) -> Result<Vec<Team>, RepositoryError>;
    /// Exact, case-insensitive name match.
    async fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError>;
    /// Fails with [`RepositoryError::Conflict`] when the name is already taken.
    async fn insert_company(&self, company: NewCompany) -> Result<Company, RepositoryError>;
    async fn companies(&self) -> Result<Vec<Company>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("company '{0}' already exists")]
    Conflict(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

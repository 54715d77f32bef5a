use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::accounts::{
    AccountRepository, Company, CsOwner, InMemoryAccountRepository, NewCompany, RepositoryError,
    Team,
};
use crate::auth::TokenVerifier;
use crate::import::{expected_labels, CompanyImporter, CompanyRoutesState, ImportLimits};

pub(super) const BOUNDARY: &str = "cs-hub-test-boundary";

pub(super) fn repository() -> Arc<InMemoryAccountRepository> {
    Arc::new(InMemoryAccountRepository::with_seed(
        ["Ana Souza", "Bruno Lima"],
        ["Squad Alpha"],
    ))
}

pub(super) fn importer<R: AccountRepository>(repository: Arc<R>) -> CompanyImporter<R> {
    CompanyImporter::new(repository, ImportLimits::default())
}

pub(super) fn header_line() -> String {
    expected_labels().join(",")
}

/// Data line with the given company and owner; other cells use fixed values.
pub(super) fn data_line(company: &str, owner: &str) -> String {
    format!(
        "{company},{owner},Squad Alpha,15/03/2024,14/03/2025,OKR,Em andamento,\
https://notebooklm.google.com/n/1,https://app.clickup.com/t/1,vip"
    )
}

pub(super) fn csv_with(lines: &[String]) -> String {
    let mut csv = header_line();
    csv.push('\n');
    for line in lines {
        csv.push_str(line);
        csv.push('\n');
    }
    csv
}

pub(super) fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(filename) => {
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
        }
        None => format!("Content-Disposition: form-data; name=\"{field}\"\r\n"),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn routes_state<R>(repository: Arc<R>) -> CompanyRoutesState<R>
where
    R: AccountRepository + 'static,
{
    CompanyRoutesState {
        importer: Arc::new(importer(repository)),
        verifier: Arc::new(TokenVerifier::from_secret(crate::auth::test_support::SECRET)),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store whose writes always fail.
pub(super) struct ReadOnlyRepository {
    pub(super) inner: InMemoryAccountRepository,
}

#[async_trait]
impl AccountRepository for ReadOnlyRepository {
    async fn owners(&self) -> Result<Vec<CsOwner>, RepositoryError> {
        self.inner.owners().await
    }

    async fn teams(&self) -> Result<Vec<Team>, RepositoryError> {
        self.inner.teams().await
    }

    async fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError> {
        self.inner.find_company_by_name(name).await
    }

    async fn insert_company(&self, _company: NewCompany) -> Result<Company, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        self.inner.companies().await
    }
}

/// Store that cannot even load its lookup tables.
pub(super) struct UnavailableRepository;

#[async_trait]
impl AccountRepository for UnavailableRepository {
    async fn owners(&self) -> Result<Vec<CsOwner>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn teams(&self) -> Result<Vec<Team>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find_company_by_name(&self, _name: &str) -> Result<Option<Company>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn insert_company(&self, _company: NewCompany) -> Result<Company, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store that misses the duplicate pre-check, as when a concurrent import
/// wins the race, so the uniqueness constraint fires on insert.
pub(super) struct RacingRepository {
    pub(super) inner: InMemoryAccountRepository,
}

#[async_trait]
impl AccountRepository for RacingRepository {
    async fn owners(&self) -> Result<Vec<CsOwner>, RepositoryError> {
        self.inner.owners().await
    }

    async fn teams(&self) -> Result<Vec<Team>, RepositoryError> {
        self.inner.teams().await
    }

    async fn find_company_by_name(&self, _name: &str) -> Result<Option<Company>, RepositoryError> {
        Ok(None)
    }

    async fn insert_company(&self, company: NewCompany) -> Result<Company, RepositoryError> {
        self.inner.insert_company(company).await
    }

    async fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        self.inner.companies().await
    }
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::domain::{Company, CompanyId, CsOwner, NewCompany, OwnerId, Team, TeamId};
use super::repository::{AccountRepository, RepositoryError};
use crate::config::DatabaseConfig;

const COMPANY_COLUMNS: &str = "id, name, owner_id, team_id, contract_start, contract_end, \
     framework, status, notebook_link, clickup_link, tags, created_at";

/// PostgreSQL-backed store. Name uniqueness is enforced by the
/// `companies_name_lower_key` index.
#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections.max(1) as u32)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        info!("running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct OwnerRow {
    id: Uuid,
    name: String,
    email: Option<String>,
}

#[derive(Debug, FromRow)]
struct TeamRow {
    id: Uuid,
    name: String,
}

#[derive(Debug, FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    owner_id: Option<Uuid>,
    team_id: Option<Uuid>,
    contract_start: Option<NaiveDate>,
    contract_end: Option<NaiveDate>,
    framework: Option<String>,
    status: String,
    notebook_link: Option<String>,
    clickup_link: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: CompanyId(row.id),
            name: row.name,
            owner_id: row.owner_id.map(OwnerId),
            team_id: row.team_id.map(TeamId),
            contract_start: row.contract_start,
            contract_end: row.contract_end,
            framework: row.framework,
            status: row.status,
            notebook_link: row.notebook_link,
            clickup_link: row.clickup_link,
            tags: row.tags,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn owners(&self) -> Result<Vec<CsOwner>, RepositoryError> {
        let rows = sqlx::query_as::<_, OwnerRow>(
            "SELECT id, name, email FROM cs_owners ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CsOwner {
                id: OwnerId(row.id),
                name: row.name,
                email: row.email,
            })
            .collect())
    }

    async fn teams(&self) -> Result<Vec<Team>, RepositoryError> {
        let rows = sqlx::query_as::<_, TeamRow>("SELECT id, name FROM teams ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Team {
                id: TeamId(row.id),
                name: row.name,
            })
            .collect())
    }

    async fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError> {
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE LOWER(name) = LOWER($1) LIMIT 1"
        );
        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Company::from))
    }

    async fn insert_company(&self, company: NewCompany) -> Result<Company, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO companies (
                id, name, owner_id, team_id, contract_start, contract_end,
                framework, status, notebook_link, clickup_link, tags, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
            RETURNING {COMPANY_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&company.name)
            .bind(company.owner_id.map(|id| id.0))
            .bind(company.team_id.map(|id| id.0))
            .bind(company.contract_start)
            .bind(company.contract_end)
            .bind(&company.framework)
            .bind(&company.status)
            .bind(&company.notebook_link)
            .bind(&company.clickup_link)
            .bind(&company.tags)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(RepositoryError::Conflict(company.name))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY LOWER(name) ASC");
        let rows = sqlx::query_as::<_, CompanyRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Company::from).collect())
    }
}

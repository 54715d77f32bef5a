use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::domain::{Company, CompanyId, CsOwner, NewCompany, OwnerId, Team, TeamId};
use super::repository::{AccountRepository, RepositoryError};

#[derive(Debug, Default)]
struct MemoryState {
    owners: Vec<CsOwner>,
    teams: Vec<Team>,
    companies: Vec<Company>,
}

/// Process-local store used for development runs and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryAccountRepository {
    pub fn with_seed<O, T>(owners: O, teams: T) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let repository = Self::default();
        for owner in owners {
            repository.add_owner(owner);
        }
        for team in teams {
            repository.add_team(team);
        }
        repository
    }

    pub fn add_owner(&self, name: impl Into<String>) -> CsOwner {
        let owner = CsOwner {
            id: OwnerId(Uuid::new_v4()),
            name: name.into(),
            email: None,
        };
        self.state().owners.push(owner.clone());
        owner
    }

    pub fn add_team(&self, name: impl Into<String>) -> Team {
        let team = Team {
            id: TeamId(Uuid::new_v4()),
            name: name.into(),
        };
        self.state().teams.push(team.clone());
        team
    }

    pub fn company_count(&self) -> usize {
        self.state().companies.len()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn owners(&self) -> Result<Vec<CsOwner>, RepositoryError> {
        Ok(self.state().owners.clone())
    }

    async fn teams(&self) -> Result<Vec<Team>, RepositoryError> {
        Ok(self.state().teams.clone())
    }

    async fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError> {
        Ok(self
            .state()
            .companies
            .iter()
            .find(|company| company.same_name(name))
            .cloned())
    }

    async fn insert_company(&self, company: NewCompany) -> Result<Company, RepositoryError> {
        let mut state = self.state();
        if state
            .companies
            .iter()
            .any(|existing| existing.same_name(&company.name))
        {
            return Err(RepositoryError::Conflict(company.name));
        }

        let company = company.into_company(CompanyId(Uuid::new_v4()), Utc::now());
        state.companies.push(company.clone());
        Ok(company)
    }

    async fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let mut companies = self.state().companies.clone();
        companies.sort_by_key(|company| company.name.to_lowercase());
        Ok(companies)
    }
}

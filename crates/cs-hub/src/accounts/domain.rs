use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub Uuid);

/// Staff member accountable for a client company ("CS Care").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsOwner {
    pub id: OwnerId,
    pub name: String,
    pub email: Option<String>,
}

/// Internal squad referenced by companies through the "Tech Responsável" label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

/// Persisted client company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub owner_id: Option<OwnerId>,
    pub team_id: Option<TeamId>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub framework: Option<String>,
    pub status: String,
    pub notebook_link: Option<String>,
    pub clickup_link: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the store assigns the identifier and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
    pub owner_id: Option<OwnerId>,
    pub team_id: Option<TeamId>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub framework: Option<String>,
    pub status: String,
    pub notebook_link: Option<String>,
    pub clickup_link: Option<String>,
    pub tags: Vec<String>,
}

impl NewCompany {
    pub fn into_company(self, id: CompanyId, created_at: DateTime<Utc>) -> Company {
        Company {
            id,
            name: self.name,
            owner_id: self.owner_id,
            team_id: self.team_id,
            contract_start: self.contract_start,
            contract_end: self.contract_end,
            framework: self.framework,
            status: self.status,
            notebook_link: self.notebook_link,
            clickup_link: self.clickup_link,
            tags: self.tags,
            created_at,
        }
    }
}

impl Company {
    /// Case-insensitive identity used for duplicate detection.
    pub fn same_name(&self, other: &str) -> bool {
        self.name.trim().to_lowercase() == other.trim().to_lowercase()
    }
}

use std::collections::HashMap;

use crate::accounts::{AccountRepository, OwnerId, RepositoryError, TeamId};

pub(crate) fn normalize_name(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .trim()
        .to_lowercase()
}

/// Human-entered name to identifier map. Later entries win when two records
/// normalize to the same key.
#[derive(Debug, Clone)]
pub(crate) struct NameLookup<Id> {
    entries: HashMap<String, Id>,
}

impl<Id: Copy> NameLookup<Id> {
    pub(crate) fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Id)>,
        S: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(name, id)| (normalize_name(name.as_ref()), id))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self { entries }
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<Id> {
        self.entries.get(&normalize_name(name)).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Owner and team tables loaded once per import.
#[derive(Debug, Clone)]
pub(crate) struct Lookups {
    pub(crate) owners: NameLookup<OwnerId>,
    pub(crate) teams: NameLookup<TeamId>,
}

impl Lookups {
    pub(crate) async fn load<R>(repository: &R) -> Result<Self, RepositoryError>
    where
        R: AccountRepository + ?Sized,
    {
        let owners = repository.owners().await?;
        let teams = repository.teams().await?;

        Ok(Self {
            owners: NameLookup::from_pairs(owners.into_iter().map(|owner| (owner.name, owner.id))),
            teams: NameLookup::from_pairs(teams.into_iter().map(|team| (team.name, team.id))),
        })
    }
}

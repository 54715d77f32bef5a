//! Company accounts, their CS owners and squads, and the stores that hold them.

pub mod domain;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use domain::{Company, CompanyId, CsOwner, NewCompany, OwnerId, Team, TeamId};
pub use memory::InMemoryAccountRepository;
pub use postgres::PgAccountRepository;
pub use repository::{AccountRepository, RepositoryError};

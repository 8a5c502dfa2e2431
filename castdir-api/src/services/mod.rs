//! Upstream people directory and actor import

pub mod actor_import;
pub mod tvmaze_client;

use async_trait::async_trait;

pub use actor_import::{import_actor, ImportOutcome};
pub use tvmaze_client::TvMazeClient;

/// Person as reported by the upstream directory
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub country: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub gender: Option<String>,
}

/// Read-only source of people and their show credits
///
/// Implementations never surface failures: an unreachable or malformed
/// upstream reads as "no data".
#[async_trait]
pub trait PeopleDirectory: Send + Sync {
    /// Candidate people for a free-text name, best match first
    async fn search_by_name(&self, name: &str) -> Option<Vec<Person>>;

    /// Names of the shows a person is credited in, in upstream order
    async fn fetch_show_names(&self, person_id: i64) -> Vec<String>;
}

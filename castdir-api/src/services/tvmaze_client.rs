//! TVmaze API client
//!
//! Person search and cast credits. Every failure is logged and folded into
//! an empty result at the [`PeopleDirectory`] boundary.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::{PeopleDirectory, Person};

const USER_AGENT: &str = concat!("castdir/", env!("CARGO_PKG_VERSION"));

/// TVmaze client errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One entry of `/search/people`
#[derive(Debug, Clone, Deserialize)]
pub struct TvSearchHit {
    pub person: TvPerson,
}

/// TVmaze person
#[derive(Debug, Clone, Deserialize)]
pub struct TvPerson {
    pub id: i64,
    pub name: String,
    pub country: Option<TvCountry>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvCountry {
    pub name: String,
}

/// One entry of `/people/{id}/castcredits?embed=show`
#[derive(Debug, Clone, Deserialize)]
pub struct TvCastCredit {
    #[serde(rename = "_embedded")]
    pub embedded: TvEmbeddedShow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvEmbeddedShow {
    pub show: TvShow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvShow {
    pub id: i64,
    pub name: String,
}

impl From<TvPerson> for Person {
    fn from(p: TvPerson) -> Self {
        Self {
            id: p.id,
            name: p.name,
            country: p.country.map(|c| c.name),
            birthday: p.birthday,
            deathday: p.deathday,
            gender: p.gender,
        }
    }
}

/// TVmaze API client
pub struct TvMazeClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl TvMazeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DirectoryError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DirectoryError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Querying TVmaze API");

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| DirectoryError::Parse(e.to_string()))
    }

    /// Search people by name
    pub async fn search_people(&self, name: &str) -> Result<Vec<TvSearchHit>, DirectoryError> {
        self.get_json("/search/people", &[("q", name)]).await
    }

    /// Cast credits with embedded shows
    pub async fn cast_credits(&self, person_id: i64) -> Result<Vec<TvCastCredit>, DirectoryError> {
        let path = format!("/people/{}/castcredits", person_id);
        self.get_json(&path, &[("embed", "show")]).await
    }
}

#[async_trait]
impl PeopleDirectory for TvMazeClient {
    async fn search_by_name(&self, name: &str) -> Option<Vec<Person>> {
        match self.search_people(name).await {
            Ok(hits) => Some(hits.into_iter().map(|hit| hit.person.into()).collect()),
            Err(e) => {
                warn!(name = %name, error = %e, "People search failed");
                None
            }
        }
    }

    async fn fetch_show_names(&self, person_id: i64) -> Vec<String> {
        match self.cast_credits(person_id).await {
            Ok(credits) => credits.into_iter().map(|c| c.embedded.show.name).collect(),
            Err(e) => {
                warn!(person_id, error = %e, "Cast credit lookup failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"[
            {"score": 0.91, "person": {"id": 12, "name": "Brad Pitt",
             "country": {"name": "United States", "code": "US"},
             "birthday": "1963-12-18", "deathday": null, "gender": "Male",
             "image": null}},
            {"score": 0.4, "person": {"id": 13, "name": "Brad Garrett",
             "country": null, "birthday": null, "deathday": null, "gender": null}}
        ]"#;

        let hits: Vec<TvSearchHit> = serde_json::from_str(body).unwrap();
        let people: Vec<Person> = hits.into_iter().map(|h| h.person.into()).collect();

        assert_eq!(people.len(), 2);
        assert_eq!(people[0].country.as_deref(), Some("United States"));
        assert_eq!(people[0].birthday.as_deref(), Some("1963-12-18"));
        assert_eq!(people[1].country, None);
    }

    #[test]
    fn test_parse_cast_credits() {
        let body = r#"[
            {"_links": {}, "_embedded": {"show": {"id": 1, "name": "First Show", "type": "Scripted"}}},
            {"_embedded": {"show": {"id": 2, "name": "Second Show"}}}
        ]"#;

        let credits: Vec<TvCastCredit> = serde_json::from_str(body).unwrap();
        let names: Vec<String> = credits.into_iter().map(|c| c.embedded.show.name).collect();
        assert_eq!(names, vec!["First Show", "Second Show"]);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_reads_as_no_data() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let client = TvMazeClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

        assert!(client.search_by_name("Brad Pitt").await.is_none());
        assert!(client.fetch_show_names(1).await.is_empty());
    }
}

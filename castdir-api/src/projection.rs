//! Actor response builder
//!
//! Hypermedia responses with `self` / `previous` / `next` links. Neighbors
//! are found by id comparison only.

use castdir_common::time::{format_date, format_datetime};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::{actors, Actor};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// `_links` section
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
}

impl Links {
    pub fn only_self(href: impl Into<String>) -> Self {
        Self {
            self_link: Link::new(href),
            previous: None,
            next: None,
        }
    }
}

/// Absolute URL of one actor
pub fn actor_href(base_url: &str, id: i64) -> String {
    format!("{}/actors/{}", base_url, id)
}

/// Full actor representation
#[derive(Debug, Clone, Serialize)]
pub struct ActorResponse {
    pub id: i64,
    #[serde(rename = "last-update")]
    pub last_update: String,
    pub name: String,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub shows: Option<Vec<String>>,
    #[serde(rename = "_links")]
    pub links: Links,
}

/// Short acknowledgement returned by create and update
#[derive(Debug, Clone, Serialize)]
pub struct ActorRef {
    pub id: i64,
    #[serde(rename = "last-update")]
    pub last_update: String,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl ActorRef {
    pub fn new(base_url: &str, actor: &Actor) -> Self {
        Self {
            id: actor.id,
            last_update: format_datetime(&actor.last_update),
            links: Links::only_self(actor_href(base_url, actor.id)),
        }
    }
}

/// Build the full response given already-resolved neighbor ids
pub fn actor_response(
    base_url: &str,
    actor: &Actor,
    previous: Option<i64>,
    next: Option<i64>,
) -> ActorResponse {
    ActorResponse {
        id: actor.id,
        last_update: format_datetime(&actor.last_update),
        name: actor.name.clone(),
        country: actor.country.clone(),
        gender: actor.gender.clone(),
        birthday: actor.birthday.as_ref().map(format_date),
        deathday: actor.deathday.as_ref().map(format_date),
        shows: actor.shows.clone(),
        links: Links {
            self_link: Link::new(actor_href(base_url, actor.id)),
            previous: previous.map(|id| Link::new(actor_href(base_url, id))),
            next: next.map(|id| Link::new(actor_href(base_url, id))),
        },
    }
}

/// Look up neighbors and build the full response
pub async fn build_actor_response(
    pool: &SqlitePool,
    base_url: &str,
    actor: &Actor,
) -> castdir_common::Result<ActorResponse> {
    let (previous, next) = actors::neighbor_ids(pool, actor.id).await?;
    Ok(actor_response(base_url, actor, previous, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn actor() -> Actor {
        Actor {
            id: 4,
            tvmaze_id: 40,
            name: "Some One".to_string(),
            country: Some("Australia".to_string()),
            birthday: NaiveDate::from_ymd_opt(1987, 5, 22),
            deathday: None,
            gender: Some("Female".to_string()),
            last_update: NaiveDate::from_ymd_opt(2021, 4, 8)
                .unwrap()
                .and_hms_opt(12, 34, 40)
                .unwrap(),
            shows: None,
        }
    }

    #[test]
    fn test_response_shape() {
        let response = actor_response("http://localhost:5000", &actor(), Some(2), None);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], 4);
        assert_eq!(json["last-update"], "2021-04-08 12:34:40");
        assert_eq!(json["birthday"], "1987-05-22");
        assert!(json["deathday"].is_null());
        assert!(json["shows"].is_null());
        assert_eq!(json["_links"]["self"]["href"], "http://localhost:5000/actors/4");
        assert_eq!(json["_links"]["previous"]["href"], "http://localhost:5000/actors/2");
        assert!(json["_links"].get("next").is_none());
    }

    #[test]
    fn test_actor_ref_has_only_self_link() {
        let json = serde_json::to_value(ActorRef::new("http://h", &actor())).unwrap();
        assert_eq!(json["_links"]["self"]["href"], "http://h/actors/4");
        assert!(json["_links"].get("previous").is_none());
        assert_eq!(json["last-update"], "2021-04-08 12:34:40");
    }
}

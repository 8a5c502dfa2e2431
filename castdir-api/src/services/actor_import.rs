//! Actor import: upstream lookup, name validation, storage

use castdir_common::time::{now, parse_date};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::{PeopleDirectory, Person};
use crate::db::{actors, Actor, NewActor};
use crate::names::{matches_top_result, normalize_query};

/// Result of importing an actor by name
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// Stored as a new record
    Created(Actor),
    /// Upstream person already stored; nothing changed
    AlreadyExists,
    /// No upstream match for the name (or upstream unavailable)
    NotFound,
}

fn upstream_date(field: &str, value: Option<&str>) -> Option<NaiveDate> {
    let value = value.filter(|v| !v.is_empty())?;
    match parse_date(value) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(field, error = %e, "Ignoring malformed upstream date");
            None
        }
    }
}

fn new_actor_from(person: &Person, shows: Vec<String>) -> NewActor {
    NewActor {
        tvmaze_id: person.id,
        name: person.name.clone(),
        country: person.country.clone(),
        birthday: upstream_date("birthday", person.birthday.as_deref()),
        deathday: upstream_date("deathday", person.deathday.as_deref()),
        gender: person.gender.clone(),
        shows: Some(shows).filter(|s| !s.is_empty()),
    }
}

/// Look a name up upstream and store the matching person
///
/// The top search hit must match the normalized request name, otherwise the
/// import is rejected as not found.
pub async fn import_actor(
    pool: &SqlitePool,
    directory: &dyn PeopleDirectory,
    raw_name: &str,
) -> castdir_common::Result<ImportOutcome> {
    let query = normalize_query(raw_name);
    if query.is_empty() {
        return Ok(ImportOutcome::NotFound);
    }

    let candidates = match directory.search_by_name(&query).await {
        Some(c) if !c.is_empty() => c,
        _ => {
            debug!(query = %query, "No upstream candidates");
            return Ok(ImportOutcome::NotFound);
        }
    };

    if !matches_top_result(&query, &candidates) {
        debug!(query = %query, top = %candidates[0].name, "Top upstream hit does not match");
        return Ok(ImportOutcome::NotFound);
    }

    let person = &candidates[0];

    if actors::get_actor_by_tvmaze_id(pool, person.id).await?.is_some() {
        return Ok(ImportOutcome::AlreadyExists);
    }

    let shows = directory.fetch_show_names(person.id).await;
    let new_actor = new_actor_from(person, shows);

    match actors::insert_actor(pool, &new_actor, now()).await? {
        Some(actor) => {
            info!(id = actor.id, tvmaze_id = actor.tvmaze_id, name = %actor.name, "Actor imported");
            Ok(ImportOutcome::Created(actor))
        }
        // Lost a race with a concurrent import of the same person
        None => Ok(ImportOutcome::AlreadyExists),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(birthday: Option<&str>) -> Person {
        Person {
            id: 5,
            name: "Somebody".to_string(),
            country: Some("Canada".to_string()),
            birthday: birthday.map(str::to_string),
            deathday: Some(String::new()),
            gender: None,
        }
    }

    #[test]
    fn test_new_actor_from_person() {
        let actor = new_actor_from(&person(Some("1970-01-02")), vec!["S".to_string()]);
        assert_eq!(actor.tvmaze_id, 5);
        assert_eq!(actor.birthday, NaiveDate::from_ymd_opt(1970, 1, 2));
        assert_eq!(actor.deathday, None);
        assert_eq!(actor.shows, Some(vec!["S".to_string()]));
    }

    #[test]
    fn test_malformed_dates_and_empty_shows_become_null() {
        let actor = new_actor_from(&person(Some("1970")), Vec::new());
        assert_eq!(actor.birthday, None);
        assert_eq!(actor.shows, None);
    }
}

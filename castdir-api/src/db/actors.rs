//! Actor record store
//!
//! Show lists are stored denormalized in a single column, joined with
//! [`SHOWS_DELIMITER`].

use castdir_common::time::{format_stored_datetime, DATE_FORMAT};
use castdir_common::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::query::OrderKey;

/// Separator between show names in the `shows` column
pub const SHOWS_DELIMITER: &str = "@%";

const SELECT_COLUMNS: &str =
    "id, tvmaze_id, name, country, birthday, deathday, gender, last_update, shows";

/// Stored actor record
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: i64,
    pub tvmaze_id: i64,
    pub name: String,
    pub country: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub deathday: Option<NaiveDate>,
    pub gender: Option<String>,
    pub last_update: NaiveDateTime,
    pub shows: Option<Vec<String>>,
}

/// Actor data fetched upstream, not yet stored
#[derive(Debug, Clone)]
pub struct NewActor {
    pub tvmaze_id: i64,
    pub name: String,
    pub country: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub deathday: Option<NaiveDate>,
    pub gender: Option<String>,
    pub shows: Option<Vec<String>>,
}

/// Fields to overwrite on an existing actor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorPatch {
    pub name: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub deathday: Option<NaiveDate>,
    pub shows: Option<Vec<String>>,
}

impl ActorPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn apply(self, actor: &mut Actor) {
        if let Some(name) = self.name {
            actor.name = name;
        }
        if let Some(country) = self.country {
            actor.country = Some(country);
        }
        if let Some(gender) = self.gender {
            actor.gender = Some(gender);
        }
        if let Some(birthday) = self.birthday {
            actor.birthday = Some(birthday);
        }
        if let Some(deathday) = self.deathday {
            actor.deathday = Some(deathday);
        }
        if let Some(shows) = self.shows {
            actor.shows = Some(shows);
        }
    }
}

/// Result of a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Actor),
    NoChanges,
    NotFound,
}

/// Join show names for storage; an empty list is stored as NULL
pub fn encode_shows(shows: Option<&[String]>) -> Option<String> {
    match shows {
        Some(list) if !list.is_empty() => Some(list.join(SHOWS_DELIMITER)),
        _ => None,
    }
}

/// Split the stored show column back into names
pub fn decode_shows(stored: Option<&str>) -> Option<Vec<String>> {
    match stored {
        Some(s) if !s.is_empty() => Some(s.split(SHOWS_DELIMITER).map(str::to_string).collect()),
        _ => None,
    }
}

fn encode_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

fn decode_date(column: &str, value: Option<String>) -> Result<Option<NaiveDate>> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| {
            // Older rows may carry a time part after the date
            let date_part = v.get(..10).unwrap_or(&v);
            NaiveDate::parse_from_str(date_part, DATE_FORMAT)
                .map_err(|e| Error::Internal(format!("bad {} value '{}': {}", column, v, e)))
        })
        .transpose()
}

fn decode_datetime(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| Error::Internal(format!("bad last_update value '{}': {}", value, e)))
}

fn actor_from_row(row: &SqliteRow) -> Result<Actor> {
    let last_update: String = row.try_get("last_update")?;
    let shows: Option<String> = row.try_get("shows")?;

    Ok(Actor {
        id: row.try_get("id")?,
        tvmaze_id: row.try_get("tvmaze_id")?,
        name: row.try_get("name")?,
        country: row.try_get("country")?,
        birthday: decode_date("birthday", row.try_get("birthday")?)?,
        deathday: decode_date("deathday", row.try_get("deathday")?)?,
        gender: row.try_get("gender")?,
        last_update: decode_datetime(&last_update)?,
        shows: decode_shows(shows.as_deref()),
    })
}

/// Insert a new actor unless its upstream id is already stored
///
/// Returns `None` when an actor with the same `tvmaze_id` exists; the store is
/// left unchanged in that case. The uniqueness check and the insert are a
/// single statement, so concurrent creates cannot both succeed.
pub async fn insert_actor(
    pool: &SqlitePool,
    actor: &NewActor,
    now: NaiveDateTime,
) -> Result<Option<Actor>> {
    let result = sqlx::query(
        r#"
        INSERT INTO actors (tvmaze_id, name, country, birthday, deathday, gender, last_update, shows)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(tvmaze_id) DO NOTHING
        "#,
    )
    .bind(actor.tvmaze_id)
    .bind(&actor.name)
    .bind(&actor.country)
    .bind(encode_date(actor.birthday))
    .bind(encode_date(actor.deathday))
    .bind(&actor.gender)
    .bind(format_stored_datetime(&now))
    .bind(encode_shows(actor.shows.as_deref()))
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(Actor {
        id: result.last_insert_rowid(),
        tvmaze_id: actor.tvmaze_id,
        name: actor.name.clone(),
        country: actor.country.clone(),
        birthday: actor.birthday,
        deathday: actor.deathday,
        gender: actor.gender.clone(),
        last_update: now,
        shows: actor.shows.clone().filter(|s| !s.is_empty()),
    }))
}

/// Load actor by internal id
pub async fn get_actor(pool: &SqlitePool, id: i64) -> Result<Option<Actor>> {
    let sql = format!("SELECT {} FROM actors WHERE id = ?", SELECT_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    row.as_ref().map(actor_from_row).transpose()
}

/// Load actor by upstream directory id
pub async fn get_actor_by_tvmaze_id(pool: &SqlitePool, tvmaze_id: i64) -> Result<Option<Actor>> {
    let sql = format!("SELECT {} FROM actors WHERE tvmaze_id = ?", SELECT_COLUMNS);
    let row = sqlx::query(&sql).bind(tvmaze_id).fetch_optional(pool).await?;

    row.as_ref().map(actor_from_row).transpose()
}

/// Closest stored ids below and above `id`
pub async fn neighbor_ids(pool: &SqlitePool, id: i64) -> Result<(Option<i64>, Option<i64>)> {
    let previous: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM actors WHERE id < ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    let next: Option<i64> = sqlx::query_scalar("SELECT MIN(id) FROM actors WHERE id > ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok((previous, next))
}

/// Delete actor by id; false when nothing was stored under that id
pub async fn delete_actor(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM actors WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Apply a partial update and refresh `last_update`
///
/// Read and write happen in one transaction. An empty patch reports
/// `NoChanges` without touching the row.
pub async fn update_actor(
    pool: &SqlitePool,
    id: i64,
    patch: ActorPatch,
    now: NaiveDateTime,
) -> Result<UpdateOutcome> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {} FROM actors WHERE id = ?", SELECT_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *tx).await?;

    let mut actor = match row {
        Some(row) => actor_from_row(&row)?,
        None => return Ok(UpdateOutcome::NotFound),
    };

    if patch.is_empty() {
        return Ok(UpdateOutcome::NoChanges);
    }

    patch.apply(&mut actor);
    actor.last_update = now;

    sqlx::query(
        r#"
        UPDATE actors
        SET name = ?, country = ?, birthday = ?, deathday = ?, gender = ?, shows = ?, last_update = ?
        WHERE id = ?
        "#,
    )
    .bind(&actor.name)
    .bind(&actor.country)
    .bind(encode_date(actor.birthday))
    .bind(encode_date(actor.deathday))
    .bind(&actor.gender)
    .bind(encode_shows(actor.shows.as_deref()))
    .bind(format_stored_datetime(&now))
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(UpdateOutcome::Updated(actor))
}

/// Ordered, paginated listing
///
/// Column names come from the fixed field whitelist, never from request
/// text. `id ASC` is appended as a final tie-breaker so pages never overlap.
pub async fn list_actors(
    pool: &SqlitePool,
    order: &[OrderKey],
    limit: i64,
    offset: i64,
) -> Result<Vec<Actor>> {
    let mut order_terms: Vec<String> = order
        .iter()
        .map(|key| format!("{} {}", key.field.column(), key.direction.sql()))
        .collect();
    order_terms.push("id ASC".to_string());

    let sql = format!(
        "SELECT {} FROM actors ORDER BY {} LIMIT ? OFFSET ?",
        SELECT_COLUMNS,
        order_terms.join(", ")
    );

    let rows = sqlx::query(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    rows.iter().map(actor_from_row).collect()
}

/// Every stored actor, ascending by id
pub async fn all_actors(pool: &SqlitePool) -> Result<Vec<Actor>> {
    let sql = format!("SELECT {} FROM actors ORDER BY id ASC", SELECT_COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    rows.iter().map(actor_from_row).collect()
}

//! Actor resource handlers
//!
//! Create by name, list, get, delete and partial update.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use castdir_common::time::{now, parse_date};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::base_url;
use crate::db::{actors, ActorPatch, UpdateOutcome};
use crate::error::ApiError;
use crate::projection::{build_actor_response, ActorRef, ActorResponse, Link};
use crate::query::{ListParams, ListPlan};
use crate::services::{import_actor, ImportOutcome};
use crate::AppState;

/// Fields a client may patch
pub const PATCHABLE_FIELDS: [&str; 6] =
    ["name", "country", "gender", "birthday", "deathday", "shows"];

/// Gender values accepted on update
pub const ALLOWED_GENDERS: [&str; 5] = ["Female", "Male", "female", "male", " "];

/// Query parameters for actor creation
#[derive(Debug, Deserialize)]
pub struct CreateParams {
    pub name: Option<String>,
}

/// Actor list page
#[derive(Debug, Serialize)]
pub struct ActorListResponse {
    pub page: i64,
    #[serde(rename = "page-size")]
    pub page_size: i64,
    pub actors: Vec<Map<String, Value>>,
    #[serde(rename = "_links")]
    pub links: ListLinks,
}

#[derive(Debug, Serialize)]
pub struct ListLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
    pub next: Link,
}

fn message(status: StatusCode, text: impl Into<String>) -> Response {
    (status, Json(json!({ "message": text.into() }))).into_response()
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest("id can only be a number".to_string()))
}

/// POST /actors?name=...
///
/// Looks the name up upstream and stores the matching person.
pub async fn create_actor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CreateParams>,
) -> Result<Response, ApiError> {
    let name = params
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("name is required".to_string()))?;

    match import_actor(&state.db, state.directory.as_ref(), &name).await? {
        ImportOutcome::Created(actor) => {
            let body = ActorRef::new(&base_url(&headers, &state), &actor);
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        ImportOutcome::AlreadyExists => Ok(message(StatusCode::OK, "Actor already in database")),
        ImportOutcome::NotFound => Err(ApiError::NotFound("The actor is not found".to_string())),
    }
}

/// GET /actors?order=&page=&size=&filter=
pub async fn list_actors(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<ActorListResponse>, ApiError> {
    let plan = ListPlan::parse(&params).map_err(|e| {
        debug!(error = %e, "Rejected list query");
        e
    })?;

    let items = plan.execute(&state.db).await?;

    let base = format!("{}/actors", base_url(&headers, &state));
    let page = plan.pagination.page;
    let href = |p: i64| Link::new(format!("{}?{}", base, plan.query_string(p)));

    Ok(Json(ActorListResponse {
        page,
        page_size: plan.pagination.size,
        actors: items,
        links: ListLinks {
            self_link: href(page),
            previous: plan.pagination.has_previous().then(|| href(page - 1)),
            next: href(plan.pagination.next_page()),
        },
    }))
}

/// GET /actors/:id
pub async fn get_actor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ActorResponse>, ApiError> {
    let id = parse_id(&id)?;

    let actor = actors::get_actor(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("The actor is not found".to_string()))?;

    let response = build_actor_response(&state.db, &base_url(&headers, &state), &actor).await?;
    Ok(Json(response))
}

/// DELETE /actors/:id
pub async fn delete_actor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    if !actors::delete_actor(&state.db, id).await? {
        return Err(ApiError::NotFound("The actor is not in database".to_string()));
    }

    info!(id, "Actor deleted");
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": format!("The actor with id {} was removed from the database!", id),
            "id": id,
        })),
    )
        .into_response())
}

/// PATCH /actors/:id
///
/// Body is a json object limited to [`PATCHABLE_FIELDS`]. Null and empty
/// values are ignored; a body with nothing left to apply reports no changes.
pub async fn update_actor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let body: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Input data is invalid".to_string()))?;
    let patch = parse_patch(&body)?;

    match actors::update_actor(&state.db, id, patch, now()).await? {
        UpdateOutcome::Updated(actor) => {
            info!(id, "Actor updated");
            let body = ActorRef::new(&base_url(&headers, &state), &actor);
            Ok((StatusCode::OK, Json(body)).into_response())
        }
        UpdateOutcome::NoChanges => Ok(message(StatusCode::OK, "No changes have been made.")),
        UpdateOutcome::NotFound => Err(ApiError::NotFound("The actor is not found".to_string())),
    }
}

fn invalid() -> ApiError {
    ApiError::BadRequest("Input data is invalid".to_string())
}

/// Non-empty string value, `None` for null or ""
fn string_field(value: &Value) -> Result<Option<String>, ApiError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(invalid()),
    }
}

/// Validate a patch body
pub fn parse_patch(body: &Value) -> Result<ActorPatch, ApiError> {
    let object = body.as_object().ok_or_else(invalid)?;

    if object.keys().any(|k| !PATCHABLE_FIELDS.contains(&k.as_str())) {
        return Err(invalid());
    }

    let mut patch = ActorPatch::default();

    for (key, value) in object {
        match key.as_str() {
            "name" => patch.name = string_field(value)?,
            "country" => patch.country = string_field(value)?,
            "gender" => {
                patch.gender = string_field(value)?;
                if let Some(gender) = &patch.gender {
                    if !ALLOWED_GENDERS.contains(&gender.as_str()) {
                        return Err(ApiError::BadRequest(
                            "Gender can only be Female or Male".to_string(),
                        ));
                    }
                }
            }
            "birthday" => {
                patch.birthday = string_field(value)?
                    .map(|s| parse_date(&s))
                    .transpose()
                    .map_err(|_| invalid())?
            }
            "deathday" => {
                patch.deathday = string_field(value)?
                    .map(|s| parse_date(&s))
                    .transpose()
                    .map_err(|_| invalid())?
            }
            "shows" => {
                patch.shows = match value {
                    Value::Null => None,
                    Value::Array(items) if items.is_empty() => None,
                    Value::Array(items) => Some(
                        items
                            .iter()
                            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                    _ => return Err(invalid()),
                }
            }
            _ => return Err(invalid()),
        }
    }

    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_patch_full() {
        let body = json!({
            "name": "Some One",
            "country": "Australia",
            "gender": "female",
            "birthday": "1987-05-22",
            "deathday": null,
            "shows": ["A", "B"],
        });

        let patch = parse_patch(&body).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Some One"));
        assert_eq!(patch.gender.as_deref(), Some("female"));
        assert_eq!(patch.birthday, NaiveDate::from_ymd_opt(1987, 5, 22));
        assert_eq!(patch.deathday, None);
        assert_eq!(patch.shows, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn test_parse_patch_ignores_empty_values() {
        let body = json!({ "name": "", "shows": [], "country": null });
        assert!(parse_patch(&body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_patch_rejects_unknown_field() {
        assert!(parse_patch(&json!({ "name": "X", "id": 3 })).is_err());
    }

    #[test]
    fn test_parse_patch_rejects_bad_values() {
        assert!(parse_patch(&json!({ "gender": "robot" })).is_err());
        assert!(parse_patch(&json!({ "birthday": "22/05/1987" })).is_err());
        assert!(parse_patch(&json!({ "shows": "A" })).is_err());
        assert!(parse_patch(&json!({ "shows": ["A", 1] })).is_err());
        assert!(parse_patch(&json!({ "name": 12 })).is_err());
        assert!(parse_patch(&json!(["name"])).is_err());
    }
}

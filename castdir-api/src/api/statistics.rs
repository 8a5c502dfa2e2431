//! Actor statistics endpoint

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use castdir_common::time::now;
use tracing::debug;

use crate::db::actors;
use crate::error::ApiError;
use crate::stats::chart::{render_svg, CHART_CONTENT_TYPE};
use crate::stats::{OutputFormat, StatsParams, StatsReport, StatsRequest};
use crate::AppState;

/// GET /actors/statistics?format=json|image&by=country,gender,...
pub async fn actor_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Response, ApiError> {
    let request = StatsRequest::parse(&params)?;

    let all = actors::all_actors(&state.db).await?;
    let report = StatsReport::compute(&all, &request.categories, now());
    debug!(
        total = report.total,
        updated = report.total_updated,
        sections = report.sections.len(),
        "Computed actor statistics"
    );

    match request.format {
        OutputFormat::Json => Ok(Json(report.to_json()).into_response()),
        OutputFormat::Image => {
            let svg = render_svg(&report)?;
            Ok(([(header::CONTENT_TYPE, CHART_CONTENT_TYPE)], svg).into_response())
        }
    }
}

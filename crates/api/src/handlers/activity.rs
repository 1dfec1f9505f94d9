//! Admin read-sides: the activity feed and dashboard stats.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use backlot_core::pagination::clamp_limit;
use backlot_db::models::activity::{ActivityEntry, ActivityFilter};
use backlot_db::repositories::{
    ActivityRepo, CampaignRepo, FilmRepo, ProductionRepo, StoryRepo, SubscriberRepo, UserRepo,
};

use crate::error::AppResult;
use crate::middleware::RequireActivity;
use crate::state::AppState;

/// Query parameters accepted by `GET /activity`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub page_type: Option<String>,
    pub event: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/activity
pub async fn list(
    RequireActivity(_user): RequireActivity,
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<ActivityEntry>>> {
    let filter = ActivityFilter {
        page_type: query.page_type,
        event: query.event,
        limit: clamp_limit(query.limit),
    };
    let entries = ActivityRepo::list(&state.pool, &filter).await?;
    Ok(Json(entries))
}

/// Response body for `GET /stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub films: i64,
    pub productions: i64,
    pub stories: i64,
    pub users: i64,
    pub subscribers: SubscriberStats,
    pub campaigns: i64,
}

#[derive(Debug, Serialize)]
pub struct SubscriberStats {
    pub total: i64,
    pub active: i64,
}

/// GET /api/stats
pub async fn stats(
    RequireActivity(_user): RequireActivity,
    State(state): State<AppState>,
) -> AppResult<Json<StatsResponse>> {
    let films = FilmRepo::count(&state.pool).await?;
    let productions = ProductionRepo::count(&state.pool).await?;
    let stories = StoryRepo::count(&state.pool).await?;
    let users = UserRepo::count(&state.pool).await?;
    let (total, active) = SubscriberRepo::counts(&state.pool).await?;
    let campaigns = CampaignRepo::count(&state.pool).await?;

    Ok(Json(StatsResponse {
        films,
        productions,
        stories,
        users,
        subscribers: SubscriberStats { total, active },
        campaigns,
    }))
}

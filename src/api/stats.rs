//! Statistics endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::Confirmation};

/// Dashboard statistics
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsResponse {
    pub subscriber_count: i64,
    pub document_count: i64,
    pub loan_count: i64,
    /// Loans whose loan date is today
    pub loans_today: i64,
    /// Loans whose return date is today
    pub returns_today: i64,
    /// Documents per category, in first-appearance order
    pub category_histogram: Vec<CategoryCount>,
    /// Documents per publication year, ascending
    pub year_histogram: Vec<YearCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryCount {
    /// Category as stored; null for documents without one
    pub category: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct YearCount {
    /// Publication year; null for documents without one
    pub year: Option<i32>,
    pub count: i64,
}

/// Result of purging the loans returned today
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurgeResponse {
    pub deleted_count: u64,
    /// Statistics recomputed after the purge
    pub stats: StatsResponse,
}

/// Get dashboard statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}

/// Delete every loan returned today
#[utoipa::path(
    delete,
    path = "/loans/returned-today",
    tag = "stats",
    params(Confirmation),
    responses(
        (status = 200, description = "Loans purged, statistics refreshed", body = PurgeResponse),
        (status = 428, description = "confirm=true missing")
    )
)]
pub async fn purge_returned_today(
    State(state): State<crate::AppState>,
    Query(confirmation): Query<Confirmation>,
) -> AppResult<Json<PurgeResponse>> {
    confirmation.require("Purging loans returned today")?;
    let response = state.services.stats.purge_returned_today().await?;
    Ok(Json(response))
}

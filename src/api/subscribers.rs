//! Subscriber management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        subscriber::{CreateSubscriber, Subscriber, UpdateSubscriber},
        Confirmation, SearchQuery,
    },
};

/// List subscribers, optionally searching by name, first name or address
#[utoipa::path(
    get,
    path = "/subscribers",
    tag = "subscribers",
    params(SearchQuery),
    responses(
        (status = 200, description = "Subscriber list", body = Vec<Subscriber>)
    )
)]
pub async fn list_subscribers(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Subscriber>>> {
    let subscribers = state.services.subscribers.list(&query).await?;
    Ok(Json(subscribers))
}

/// Get subscriber by ID
#[utoipa::path(
    get,
    path = "/subscribers/{id}",
    tag = "subscribers",
    params(("id" = String, Path, description = "Subscriber ID")),
    responses(
        (status = 200, description = "Subscriber details", body = Subscriber),
        (status = 404, description = "Subscriber not found")
    )
)]
pub async fn get_subscriber(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Subscriber>> {
    let subscriber = state.services.subscribers.get_by_id(&id).await?;
    Ok(Json(subscriber))
}

/// Register a new subscriber
#[utoipa::path(
    post,
    path = "/subscribers",
    tag = "subscribers",
    request_body = CreateSubscriber,
    responses(
        (status = 201, description = "Subscriber created", body = Subscriber),
        (status = 400, description = "Missing name or first name")
    )
)]
pub async fn create_subscriber(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateSubscriber>,
) -> AppResult<(StatusCode, Json<Subscriber>)> {
    let subscriber = state.services.subscribers.create(&data).await?;
    Ok((StatusCode::CREATED, Json(subscriber)))
}

/// Update subscriber
#[utoipa::path(
    put,
    path = "/subscribers/{id}",
    tag = "subscribers",
    params(("id" = String, Path, description = "Subscriber ID")),
    request_body = UpdateSubscriber,
    responses(
        (status = 200, description = "Subscriber updated", body = Subscriber),
        (status = 404, description = "Subscriber not found")
    )
)]
pub async fn update_subscriber(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateSubscriber>,
) -> AppResult<Json<Subscriber>> {
    let subscriber = state.services.subscribers.update(&id, &data).await?;
    Ok(Json(subscriber))
}

/// Delete subscriber
#[utoipa::path(
    delete,
    path = "/subscribers/{id}",
    tag = "subscribers",
    params(
        ("id" = String, Path, description = "Subscriber ID"),
        Confirmation
    ),
    responses(
        (status = 204, description = "Subscriber deleted"),
        (status = 404, description = "Subscriber not found"),
        (status = 428, description = "confirm=true missing")
    )
)]
pub async fn delete_subscriber(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Query(confirmation): Query<Confirmation>,
) -> AppResult<StatusCode> {
    confirmation.require("Deleting a subscriber")?;
    state.services.subscribers.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

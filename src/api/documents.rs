//! Document (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        document::{CreateDocument, Document, UpdateDocument},
        Confirmation, SearchQuery,
    },
    services::availability::Availability,
};

/// List documents, optionally searching by title, author or category
#[utoipa::path(
    get,
    path = "/documents",
    tag = "documents",
    params(SearchQuery),
    responses(
        (status = 200, description = "Document list", body = Vec<Document>)
    )
)]
pub async fn list_documents(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let documents = state.services.documents.list(&query).await?;
    Ok(Json(documents))
}

/// Get document by ID
#[utoipa::path(
    get,
    path = "/documents/{id}",
    tag = "documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document details", body = Document),
        (status = 404, description = "Document not found")
    )
)]
pub async fn get_document(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Document>> {
    let document = state.services.documents.get_by_id(&id).await?;
    Ok(Json(document))
}

/// Add a document to the catalog
#[utoipa::path(
    post,
    path = "/documents",
    tag = "documents",
    request_body = CreateDocument,
    responses(
        (status = 201, description = "Document created", body = Document),
        (status = 400, description = "Missing field or unknown category")
    )
)]
pub async fn create_document(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<Document>)> {
    let document = state.services.documents.create(&data).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// Update document
#[utoipa::path(
    put,
    path = "/documents/{id}",
    tag = "documents",
    params(("id" = String, Path, description = "Document ID")),
    request_body = UpdateDocument,
    responses(
        (status = 200, description = "Document updated", body = Document),
        (status = 404, description = "Document not found")
    )
)]
pub async fn update_document(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateDocument>,
) -> AppResult<Json<Document>> {
    let document = state.services.documents.update(&id, &data).await?;
    Ok(Json(document))
}

/// Delete document
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    tag = "documents",
    params(
        ("id" = String, Path, description = "Document ID"),
        Confirmation
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Document not found"),
        (status = 428, description = "confirm=true missing")
    )
)]
pub async fn delete_document(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Query(confirmation): Query<Confirmation>,
) -> AppResult<StatusCode> {
    confirmation.require("Deleting a document")?;
    state.services.documents.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check whether a document can be loaned now
#[utoipa::path(
    get,
    path = "/documents/{id}/availability",
    tag = "documents",
    params(("id" = String, Path, description = "Document ID, or title")),
    responses(
        (status = 200, description = "Availability under the configured policy", body = Availability),
        (status = 400, description = "Title matches several documents")
    )
)]
pub async fn get_availability(
    State(state): State<crate::AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<Availability>> {
    let availability = state.services.availability.is_available(&reference).await?;
    Ok(Json(availability))
}

//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        loan::{CreateLoan, Loan, UpdateLoan},
        Confirmation,
    },
};

/// List every loan
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "Loan list", body = Vec<Loan>)
    )
)]
pub async fn list_loans(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.list().await?;
    Ok(Json(loans))
}

/// Get loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = String, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan details", body = Loan),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.get_by_id(&id).await?;
    Ok(Json(loan))
}

/// Create a new loan (borrow a document)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Subscriber or document not found"),
        (status = 409, description = "Document already on loan")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let loan = state.services.loans.create(&request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Update a loan's subscriber, document or loan date
#[utoipa::path(
    put,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = String, Path, description = "Loan ID")),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan updated", body = Loan),
        (status = 400, description = "No valid fields to update"),
        (status = 404, description = "Loan or document not found")
    )
)]
pub async fn update_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateLoan>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.update(&id, &request).await?;
    Ok(Json(loan))
}

/// Return a borrowed document
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(("id" = String, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Document returned", body = Loan),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.return_loan(&id).await?;
    Ok(Json(loan))
}

/// Delete a loan record
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID"),
        Confirmation
    ),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 404, description = "Loan not found"),
        (status = 428, description = "confirm=true missing")
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Query(confirmation): Query<Confirmation>,
) -> AppResult<StatusCode> {
    confirmation.require("Deleting a loan")?;
    state.services.loans.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

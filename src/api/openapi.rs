//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{documents, health, loans, stats, subscribers};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mediatheque API",
        version = "1.0.0",
        description = "Library management REST API: subscribers, documents, loans and dashboard statistics",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Subscribers
        subscribers::list_subscribers,
        subscribers::get_subscriber,
        subscribers::create_subscriber,
        subscribers::update_subscriber,
        subscribers::delete_subscriber,
        // Documents
        documents::list_documents,
        documents::get_document,
        documents::create_document,
        documents::update_document,
        documents::delete_document,
        documents::get_availability,
        // Loans
        loans::list_loans,
        loans::get_loan,
        loans::create_loan,
        loans::update_loan,
        loans::return_loan,
        loans::delete_loan,
        // Stats
        stats::get_stats,
        stats::purge_returned_today,
    ),
    components(
        schemas(
            // Subscribers
            crate::models::subscriber::Subscriber,
            crate::models::subscriber::CreateSubscriber,
            crate::models::subscriber::UpdateSubscriber,
            // Documents
            crate::models::document::Document,
            crate::models::document::CreateDocument,
            crate::models::document::UpdateDocument,
            crate::services::availability::Availability,
            crate::services::availability::AvailabilityPolicy,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::CreateLoan,
            crate::models::loan::UpdateLoan,
            // Stats
            stats::StatsResponse,
            stats::CategoryCount,
            stats::YearCount,
            stats::PurgeResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "subscribers", description = "Subscriber management"),
        (name = "documents", description = "Catalog management and availability"),
        (name = "loans", description = "Loan management"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

//! Subscriber (library patron) model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Subscriber record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subscriber {
    pub id: String,
    /// Last name
    pub name: String,
    pub first_name: String,
    pub address: Option<String>,
    /// Set by the server when the subscriber is created
    pub registration_date: Option<NaiveDate>,
}

/// Create subscriber request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubscriber {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    pub address: Option<String>,
}

/// Update subscriber request (only provided fields change)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSubscriber {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    pub address: Option<String>,
}

impl UpdateSubscriber {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.first_name.is_none() && self.address.is_none()
    }
}

//! Loan model and related types

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::dates;

/// Loan record. Dates are local wall-clock times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: String,
    pub subscriber_id: String,
    /// Identifier of the loaned document
    pub document_id: String,
    pub loan_date: NaiveDateTime,
    /// Absent while the document has not been returned
    pub return_date: Option<NaiveDateTime>,
}

impl Loan {
    /// Whether the loan still holds its document on `today`: not returned,
    /// or returned on or after that day.
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        self.return_date.map_or(true, |returned| returned.date() >= today)
    }
}

/// Create loan request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    #[validate(length(min = 1, message = "Subscriber is required"))]
    pub subscriber_id: String,
    /// Document identifier, or its title for older clients
    #[validate(length(min = 1, message = "Document is required"))]
    pub document: String,
    /// Defaults to now; `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    #[schema(value_type = Option<String>)]
    pub loan_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    #[schema(value_type = Option<String>)]
    pub return_date: Option<NaiveDateTime>,
    /// Skip the availability check
    #[serde(default)]
    pub force: bool,
}

/// Update loan request. Return dates change only through the return endpoint.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateLoan {
    pub subscriber_id: Option<String>,
    /// Document identifier, or its title for older clients
    pub document: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_optional")]
    #[schema(value_type = Option<String>)]
    pub loan_date: Option<NaiveDateTime>,
    /// Skip the availability check when moving the loan to another document
    #[serde(default)]
    pub force: bool,
}

impl UpdateLoan {
    pub fn is_empty(&self) -> bool {
        self.subscriber_id.is_none() && self.document.is_none() && self.loan_date.is_none()
    }
}

/// Loan ready to be stored, with its document reference resolved
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoan {
    pub subscriber_id: String,
    pub document_id: String,
    pub loan_date: NaiveDateTime,
    pub return_date: Option<NaiveDateTime>,
}

/// Field changes for a stored loan, with its document reference resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanChanges {
    pub subscriber_id: Option<String>,
    pub document_id: Option<String>,
    pub loan_date: Option<NaiveDateTime>,
}

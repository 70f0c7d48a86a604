//! Document (catalog item) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Document record.
///
/// `category` and `year` are optional at the storage level so that records
/// imported without them still load; they surface as the unknown bucket in
/// statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Category as entered (Book, CD, DVD, ...), never normalized
    pub category: Option<String>,
    /// Publication year
    pub year: Option<i32>,
}

impl Document {
    /// Values a loan may hold in `document_id` to reference this document.
    /// Loans recorded by older clients store the title instead of the id.
    pub fn linkage_keys(&self) -> [&str; 2] {
        [&self.id, &self.title]
    }
}

/// Create document request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDocument {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub year: i32,
}

/// Update document request (only provided fields change)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDocument {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
}

impl UpdateDocument {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.category.is_none() && self.year.is_none()
    }
}

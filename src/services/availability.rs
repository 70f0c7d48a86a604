//! Document availability rules.
//!
//! Two named policies decide whether a document can be loaned:
//!
//! - [`AvailabilityPolicy::Legacy`]: any loan record referencing the document
//!   blocks it, returned or not, until that record is deleted. This is how the
//!   first version of the application behaved.
//! - [`AvailabilityPolicy::OpenLoan`]: only an open loan blocks it, i.e. a loan
//!   with no return date or a return date on or after today.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Document, Loan},
    repository::LibraryStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityPolicy {
    Legacy,
    OpenLoan,
}

impl AvailabilityPolicy {
    /// Decide availability of a document given every known loan.
    ///
    /// `document_keys` lists every value a loan may store to reference the
    /// document: its id, and its title for loans recorded by older clients.
    pub fn is_available(self, loans: &[Loan], document_keys: &[&str], today: NaiveDate) -> bool {
        let mut referencing = loans
            .iter()
            .filter(|loan| document_keys.contains(&loan.document_id.as_str()));
        match self {
            AvailabilityPolicy::Legacy => referencing.next().is_none(),
            AvailabilityPolicy::OpenLoan => !referencing.any(|loan| loan.is_open_on(today)),
        }
    }
}

/// Availability check performed inside a loan reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityCheck {
    pub policy: AvailabilityPolicy,
    pub today: NaiveDate,
}

impl AvailabilityCheck {
    pub fn ensure_available(&self, loans: &[Loan], document_keys: &[&str]) -> AppResult<()> {
        if self.policy.is_available(loans, document_keys, self.today) {
            Ok(())
        } else {
            Err(AppError::DocumentUnavailable(format!(
                "Document {} is already on loan",
                document_keys.first().copied().unwrap_or_default()
            )))
        }
    }
}

/// Resolve a document reference: identifier first, then title.
///
/// Titles are not unique; a title shared by several documents is rejected.
pub async fn resolve_document(store: &dyn LibraryStore, reference: &str) -> AppResult<Option<Document>> {
    match store.get_document(reference).await {
        Ok(document) => return Ok(Some(document)),
        Err(AppError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let mut by_title = store.find_documents_by_title(reference).await?;
    match by_title.len() {
        0 => Ok(None),
        1 => {
            let document = by_title.remove(0);
            tracing::warn!(
                "Document reference '{}' resolved by title to id={}",
                reference,
                document.id
            );
            Ok(Some(document))
        }
        n => Err(AppError::BadRequest(format!(
            "Title '{}' matches {} documents, use the document id",
            reference, n
        ))),
    }
}

/// Availability answer for one document reference
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Availability {
    /// Reference as requested
    pub reference: String,
    /// Resolved document identifier, when the reference matched a document
    pub document_id: Option<String>,
    pub available: bool,
    pub policy: AvailabilityPolicy,
}

#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<dyn LibraryStore>,
    policy: AvailabilityPolicy,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn LibraryStore>, policy: AvailabilityPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> AvailabilityPolicy {
        self.policy
    }

    /// Whether the referenced document can be loaned right now.
    ///
    /// An unknown reference is evaluated as-is, so it is available unless
    /// loans store that literal value.
    pub async fn is_available(&self, reference: &str) -> AppResult<Availability> {
        let document = resolve_document(self.store.as_ref(), reference).await?;
        let loans = self.store.list_loans().await?;
        let today = Local::now().date_naive();

        let keys = match document {
            Some(ref document) => document.linkage_keys().to_vec(),
            None => vec![reference],
        };
        let available = self.policy.is_available(&loans, &keys, today);

        Ok(Availability {
            reference: reference.to_string(),
            document_id: document.map(|d| d.id),
            available,
            policy: self.policy,
        })
    }
}

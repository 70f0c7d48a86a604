//! Loan management service

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use validator::Validate;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan, LoanChanges, NewLoan, UpdateLoan},
    repository::LibraryStore,
    services::availability::{resolve_document, AvailabilityCheck},
};

#[derive(Clone)]
pub struct LoansService {
    store: Arc<dyn LibraryStore>,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(store: Arc<dyn LibraryStore>, config: LoansConfig) -> Self {
        Self { store, config }
    }

    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        self.store.list_loans().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Loan> {
        self.store.get_loan(id).await
    }

    /// Resolve a document reference that must designate an existing document
    async fn document_id(&self, reference: &str) -> AppResult<String> {
        resolve_document(self.store.as_ref(), reference)
            .await?
            .map(|document| document.id)
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", reference)))
    }

    /// Availability check to run against the store, unless disabled or forced
    fn availability_check(&self, force: bool, now: NaiveDateTime) -> Option<AvailabilityCheck> {
        (self.config.enforce_availability && !force).then(|| AvailabilityCheck {
            policy: self.config.availability_policy,
            today: now.date(),
        })
    }

    /// Create a new loan (borrow a document)
    pub async fn create(&self, request: &CreateLoan) -> AppResult<Loan> {
        request.validate()?;

        let now = Local::now().naive_local();
        let loan_date = request.loan_date.unwrap_or(now);
        if let Some(return_date) = request.return_date {
            if return_date < loan_date {
                return Err(AppError::Validation(
                    "Return date cannot precede the loan date".to_string(),
                ));
            }
        }

        let new_loan = NewLoan {
            subscriber_id: request.subscriber_id.clone(),
            document_id: self.document_id(&request.document).await?,
            loan_date,
            return_date: request.return_date,
        };

        let check = self.availability_check(request.force, now);

        match self.store.reserve_loan(&new_loan, check).await {
            Ok(loan) => {
                tracing::info!(
                    "Loan created: id={} document={} subscriber={}{}",
                    loan.id,
                    loan.document_id,
                    loan.subscriber_id,
                    if request.force { " (forced)" } else { "" }
                );
                Ok(loan)
            }
            Err(AppError::DocumentUnavailable(msg)) => {
                tracing::warn!("Loan refused for document {}: {}", new_loan.document_id, msg);
                Err(AppError::DocumentUnavailable(msg))
            }
            Err(e) => Err(e),
        }
    }

    /// Change the subscriber, document or loan date of a loan
    pub async fn update(&self, id: &str, request: &UpdateLoan) -> AppResult<Loan> {
        if request.is_empty() {
            return Err(AppError::BadRequest("No valid fields to update".to_string()));
        }

        if let Some(loan_date) = request.loan_date {
            let current = self.store.get_loan(id).await?;
            if current.return_date.is_some_and(|returned| returned < loan_date) {
                return Err(AppError::Validation(
                    "Loan date cannot follow the return date".to_string(),
                ));
            }
        }

        let document_id = match request.document {
            Some(ref reference) => Some(self.document_id(reference).await?),
            None => None,
        };

        let check = match document_id {
            Some(_) => self.availability_check(request.force, Local::now().naive_local()),
            None => None,
        };

        let changes = LoanChanges {
            subscriber_id: request.subscriber_id.clone(),
            document_id,
            loan_date: request.loan_date,
        };

        match self.store.update_loan(id, &changes, check).await {
            Err(AppError::DocumentUnavailable(msg)) => {
                tracing::warn!("Loan {} not moved: {}", id, msg);
                Err(AppError::DocumentUnavailable(msg))
            }
            result => result,
        }
    }

    /// Record the return of a loaned document now
    pub async fn return_loan(&self, id: &str) -> AppResult<Loan> {
        let loan = self.store.return_loan(id, Local::now().naive_local()).await?;
        tracing::info!("Loan returned: id={} document={}", loan.id, loan.document_id);
        Ok(loan)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete_loan(id).await?;
        tracing::info!("Loan deleted: id={}", id);
        Ok(())
    }
}

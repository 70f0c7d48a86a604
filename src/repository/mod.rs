//! Repository layer for database operations

pub mod documents;
pub mod loans;
pub mod subscribers;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        document::{CreateDocument, UpdateDocument},
        loan::{LoanChanges, NewLoan},
        subscriber::{CreateSubscriber, UpdateSubscriber},
        Document, Loan, SearchQuery, Subscriber,
    },
    services::{availability::AvailabilityCheck, stats::DayWindow},
};

/// The three collections read together, as seen at one instant
#[derive(Debug, Clone, Default)]
pub struct LibrarySnapshot {
    pub subscribers: Vec<Subscriber>,
    pub documents: Vec<Document>,
    pub loans: Vec<Loan>,
}

/// Record store operations used by the services.
///
/// [`Repository`] is the Postgres implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    async fn list_subscribers(&self, query: &SearchQuery) -> AppResult<Vec<Subscriber>>;
    async fn get_subscriber(&self, id: &str) -> AppResult<Subscriber>;
    async fn create_subscriber(&self, data: &CreateSubscriber, registration_date: NaiveDate) -> AppResult<Subscriber>;
    async fn update_subscriber(&self, id: &str, data: &UpdateSubscriber) -> AppResult<Subscriber>;
    async fn delete_subscriber(&self, id: &str) -> AppResult<()>;

    async fn list_documents(&self, query: &SearchQuery) -> AppResult<Vec<Document>>;
    async fn get_document(&self, id: &str) -> AppResult<Document>;
    async fn find_documents_by_title(&self, title: &str) -> AppResult<Vec<Document>>;
    async fn create_document(&self, data: &CreateDocument) -> AppResult<Document>;
    async fn update_document(&self, id: &str, data: &UpdateDocument) -> AppResult<Document>;
    async fn delete_document(&self, id: &str) -> AppResult<()>;

    async fn list_loans(&self) -> AppResult<Vec<Loan>>;
    async fn get_loan(&self, id: &str) -> AppResult<Loan>;
    /// Atomically check availability (when `check` is set) and insert the loan.
    /// Loans keyed by the document's id or its title both count.
    async fn reserve_loan(&self, loan: &NewLoan, check: Option<AvailabilityCheck>) -> AppResult<Loan>;
    /// Apply `changes`; a document change is checked like a reservation when `check` is set
    async fn update_loan(
        &self,
        id: &str,
        changes: &LoanChanges,
        check: Option<AvailabilityCheck>,
    ) -> AppResult<Loan>;
    async fn return_loan(&self, id: &str, returned_at: chrono::NaiveDateTime) -> AppResult<Loan>;
    async fn delete_loan(&self, id: &str) -> AppResult<()>;
    /// Delete loans whose return date falls within `window`, returning how many
    async fn purge_loans_returned_within(&self, window: DayWindow) -> AppResult<u64>;

    /// Read all three collections from one consistent snapshot
    async fn snapshot(&self) -> AppResult<LibrarySnapshot>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub subscribers: subscribers::SubscribersRepository,
    pub documents: documents::DocumentsRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            subscribers: subscribers::SubscribersRepository::new(pool.clone()),
            documents: documents::DocumentsRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl LibraryStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_subscribers(&self, query: &SearchQuery) -> AppResult<Vec<Subscriber>> {
        self.subscribers.list(query).await
    }

    async fn get_subscriber(&self, id: &str) -> AppResult<Subscriber> {
        self.subscribers.get_by_id(id).await
    }

    async fn create_subscriber(&self, data: &CreateSubscriber, registration_date: NaiveDate) -> AppResult<Subscriber> {
        self.subscribers.create(data, registration_date).await
    }

    async fn update_subscriber(&self, id: &str, data: &UpdateSubscriber) -> AppResult<Subscriber> {
        self.subscribers.update(id, data).await
    }

    async fn delete_subscriber(&self, id: &str) -> AppResult<()> {
        self.subscribers.delete(id).await
    }

    async fn list_documents(&self, query: &SearchQuery) -> AppResult<Vec<Document>> {
        self.documents.list(query).await
    }

    async fn get_document(&self, id: &str) -> AppResult<Document> {
        self.documents.get_by_id(id).await
    }

    async fn find_documents_by_title(&self, title: &str) -> AppResult<Vec<Document>> {
        self.documents.find_by_title(title).await
    }

    async fn create_document(&self, data: &CreateDocument) -> AppResult<Document> {
        self.documents.create(data).await
    }

    async fn update_document(&self, id: &str, data: &UpdateDocument) -> AppResult<Document> {
        self.documents.update(id, data).await
    }

    async fn delete_document(&self, id: &str) -> AppResult<()> {
        self.documents.delete(id).await
    }

    async fn list_loans(&self) -> AppResult<Vec<Loan>> {
        self.loans.list().await
    }

    async fn get_loan(&self, id: &str) -> AppResult<Loan> {
        self.loans.get_by_id(id).await
    }

    async fn reserve_loan(&self, loan: &NewLoan, check: Option<AvailabilityCheck>) -> AppResult<Loan> {
        self.loans.reserve(loan, check).await
    }

    async fn update_loan(
        &self,
        id: &str,
        changes: &LoanChanges,
        check: Option<AvailabilityCheck>,
    ) -> AppResult<Loan> {
        self.loans.update(id, changes, check).await
    }

    async fn return_loan(&self, id: &str, returned_at: chrono::NaiveDateTime) -> AppResult<Loan> {
        self.loans.mark_returned(id, returned_at).await
    }

    async fn delete_loan(&self, id: &str) -> AppResult<()> {
        self.loans.delete(id).await
    }

    async fn purge_loans_returned_within(&self, window: DayWindow) -> AppResult<u64> {
        self.loans.delete_returned_within(window).await
    }

    async fn snapshot(&self) -> AppResult<LibrarySnapshot> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let subscribers = sqlx::query_as::<_, Subscriber>(subscribers::SELECT_ALL)
            .fetch_all(&mut *tx)
            .await?;
        let documents = sqlx::query_as::<_, Document>(documents::SELECT_ALL)
            .fetch_all(&mut *tx)
            .await?;
        let loans = sqlx::query_as::<_, Loan>(loans::SELECT_ALL)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(LibrarySnapshot {
            subscribers,
            documents,
            loans,
        })
    }
}

//! Loans repository for database operations

use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{Loan, LoanChanges, NewLoan},
        new_id,
    },
    services::{availability::AvailabilityCheck, stats::DayWindow},
};

pub(crate) const SELECT_ALL: &str =
    "SELECT id, subscriber_id, document_id, loan_date, return_date FROM loans ORDER BY created_at, id";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List every loan, returned or not
    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        let rows = sqlx::query_as::<_, Loan>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            "SELECT id, subscriber_id, document_id, loan_date, return_date FROM loans WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", id)))
    }

    /// Lock a document row until the end of the transaction.
    /// Returns the document's id and title.
    async fn lock_document(
        tx: &mut Transaction<'_, Postgres>,
        document_id: &str,
    ) -> AppResult<(String, String)> {
        sqlx::query_as::<_, (String, String)>(
            "SELECT id, title FROM documents WHERE id = $1 FOR UPDATE",
        )
        .bind(document_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", document_id)))
    }

    /// Loans referencing any of `keys`, leaving out the loan `excluding`
    async fn loans_referencing(
        tx: &mut Transaction<'_, Postgres>,
        keys: &[&str],
        excluding: Option<&str>,
    ) -> AppResult<Vec<Loan>> {
        let keys: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
        let rows = sqlx::query_as::<_, Loan>(
            r#"
            SELECT id, subscriber_id, document_id, loan_date, return_date
            FROM loans
            WHERE document_id = ANY($1) AND ($2::TEXT IS NULL OR id <> $2)
            "#,
        )
        .bind(keys)
        .bind(excluding)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows)
    }

    /// Create a loan in one transaction.
    ///
    /// The document row is locked first so that two concurrent reservations
    /// of the same document cannot both pass the availability check.
    pub async fn reserve(&self, loan: &NewLoan, check: Option<AvailabilityCheck>) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let (document_id, title) = Self::lock_document(&mut tx, &loan.document_id).await?;

        let subscriber_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM subscribers WHERE id = $1)")
                .bind(&loan.subscriber_id)
                .fetch_one(&mut *tx)
                .await?;
        if !subscriber_exists {
            return Err(AppError::NotFound(format!("Subscriber {} not found", loan.subscriber_id)));
        }

        if let Some(check) = check {
            let keys = [document_id.as_str(), title.as_str()];
            let existing = Self::loans_referencing(&mut tx, &keys, None).await?;
            check.ensure_available(&existing, &keys)?;
        }

        let row = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (id, subscriber_id, document_id, loan_date, return_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, subscriber_id, document_id, loan_date, return_date
            "#,
        )
        .bind(new_id())
        .bind(&loan.subscriber_id)
        .bind(&document_id)
        .bind(loan.loan_date)
        .bind(loan.return_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Update subscriber, document or loan date of a loan.
    ///
    /// Moving the loan to another document locks that document and, when
    /// `check` is set, applies it over the document's other loans.
    pub async fn update(
        &self,
        id: &str,
        changes: &LoanChanges,
        check: Option<AvailabilityCheck>,
    ) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        if let Some(ref target) = changes.document_id {
            let (document_id, title) = Self::lock_document(&mut tx, target).await?;
            if let Some(check) = check {
                let keys = [document_id.as_str(), title.as_str()];
                let others = Self::loans_referencing(&mut tx, &keys, Some(id)).await?;
                check.ensure_available(&others, &keys)?;
            }
        }

        let row = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET
                subscriber_id = COALESCE($2, subscriber_id),
                document_id = COALESCE($3, document_id),
                loan_date = COALESCE($4, loan_date)
            WHERE id = $1
            RETURNING id, subscriber_id, document_id, loan_date, return_date
            "#,
        )
        .bind(id)
        .bind(&changes.subscriber_id)
        .bind(&changes.document_id)
        .bind(changes.loan_date)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", id)))?;

        tx.commit().await?;
        Ok(row)
    }

    /// Set the return date of a loan that has none yet
    pub async fn mark_returned(&self, id: &str, returned_at: NaiveDateTime) -> AppResult<Loan> {
        let loan = self.get_by_id(id).await?;
        if loan.return_date.is_some() {
            return Err(AppError::Conflict(format!("Loan {} already returned", id)));
        }

        let row = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET return_date = $2
            WHERE id = $1 AND return_date IS NULL
            RETURNING id, subscriber_id, document_id, loan_date, return_date
            "#,
        )
        .bind(id)
        .bind(returned_at)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| AppError::Conflict(format!("Loan {} already returned", id)))
    }

    /// Delete loan
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Loan {} not found", id)));
        }
        Ok(())
    }

    /// Delete every loan returned within the window
    pub async fn delete_returned_within(&self, window: DayWindow) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM loans WHERE return_date >= $1 AND return_date <= $2",
        )
        .bind(window.start)
        .bind(window.end)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

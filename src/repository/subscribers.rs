//! Subscribers repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        new_id,
        subscriber::{CreateSubscriber, Subscriber, UpdateSubscriber},
        SearchQuery,
    },
};

pub(crate) const SELECT_ALL: &str =
    "SELECT id, name, first_name, address, registration_date FROM subscribers ORDER BY created_at, id";

#[derive(Clone)]
pub struct SubscribersRepository {
    pool: Pool<Postgres>,
}

impl SubscribersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List subscribers, optionally filtered on name, first name or address
    pub async fn list(&self, query: &SearchQuery) -> AppResult<Vec<Subscriber>> {
        let rows = match query.pattern() {
            None => {
                sqlx::query_as::<_, Subscriber>(SELECT_ALL)
                    .fetch_all(&self.pool)
                    .await?
            }
            Some(pattern) => {
                sqlx::query_as::<_, Subscriber>(
                    r#"
                    SELECT id, name, first_name, address, registration_date
                    FROM subscribers
                    WHERE name ILIKE $1 ESCAPE '\' OR first_name ILIKE $1 ESCAPE '\' OR address ILIKE $1 ESCAPE '\'
                    ORDER BY created_at, id
                    "#,
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// Get subscriber by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Subscriber> {
        sqlx::query_as::<_, Subscriber>(
            "SELECT id, name, first_name, address, registration_date FROM subscribers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Subscriber {} not found", id)))
    }

    /// Create subscriber
    pub async fn create(&self, data: &CreateSubscriber, registration_date: NaiveDate) -> AppResult<Subscriber> {
        let row = sqlx::query_as::<_, Subscriber>(
            r#"
            INSERT INTO subscribers (id, name, first_name, address, registration_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, first_name, address, registration_date
            "#,
        )
        .bind(new_id())
        .bind(&data.name)
        .bind(&data.first_name)
        .bind(&data.address)
        .bind(registration_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update the provided fields of a subscriber
    pub async fn update(&self, id: &str, data: &UpdateSubscriber) -> AppResult<Subscriber> {
        let mut sets: Vec<String> = Vec::new();

        // $1 is the id; fields follow in push order
        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, sets.len() + 2));
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.first_name, "first_name");
        add_field!(data.address, "address");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE subscribers SET {} WHERE id = $1 RETURNING id, name, first_name, address, registration_date",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, Subscriber>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.first_name);
        bind_field!(data.address);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subscriber {} not found", id)))
    }

    /// Delete subscriber
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM subscribers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Subscriber {} not found", id)));
        }
        Ok(())
    }
}

//! Documents repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        document::{CreateDocument, Document, UpdateDocument},
        new_id, SearchQuery,
    },
};

pub(crate) const SELECT_ALL: &str =
    "SELECT id, title, author, category, year FROM documents ORDER BY created_at, id";

#[derive(Clone)]
pub struct DocumentsRepository {
    pool: Pool<Postgres>,
}

impl DocumentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List documents, optionally filtered on title, author or category
    pub async fn list(&self, query: &SearchQuery) -> AppResult<Vec<Document>> {
        let rows = match query.pattern() {
            None => {
                sqlx::query_as::<_, Document>(SELECT_ALL)
                    .fetch_all(&self.pool)
                    .await?
            }
            Some(pattern) => {
                sqlx::query_as::<_, Document>(
                    r#"
                    SELECT id, title, author, category, year
                    FROM documents
                    WHERE title ILIKE $1 ESCAPE '\' OR author ILIKE $1 ESCAPE '\' OR category ILIKE $1 ESCAPE '\'
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

    /// Get document by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "SELECT id, title, author, category, year FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))
    }

    /// Documents whose title is exactly `title`
    pub async fn find_by_title(&self, title: &str) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, Document>(
            "SELECT id, title, author, category, year FROM documents WHERE title = $1 ORDER BY created_at, id",
        )
        .bind(title)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create document
    pub async fn create(&self, data: &CreateDocument) -> AppResult<Document> {
        let row = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (id, title, author, category, year)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author, category, year
            "#,
        )
        .bind(new_id())
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.category)
        .bind(data.year)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update the provided fields of a document
    pub async fn update(&self, id: &str, data: &UpdateDocument) -> AppResult<Document> {
        let mut sets: Vec<String> = Vec::new();

        // $1 is the id; fields follow in push order
        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, sets.len() + 2));
                }
            };
        }

        add_field!(data.title, "title");
        add_field!(data.author, "author");
        add_field!(data.category, "category");
        add_field!(data.year, "year");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE documents SET {} WHERE id = $1 RETURNING id, title, author, category, year",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, Document>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.title);
        bind_field!(data.author);
        bind_field!(data.category);
        bind_field!(data.year);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))
    }

    /// Delete document
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Document {} not found", id)));
        }
        Ok(())
    }
}

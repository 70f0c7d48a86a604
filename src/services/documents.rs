//! Catalog (documents) service

use std::sync::Arc;

use validator::Validate;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        document::{CreateDocument, Document, UpdateDocument},
        SearchQuery,
    },
    repository::LibraryStore,
};

#[derive(Clone)]
pub struct DocumentsService {
    store: Arc<dyn LibraryStore>,
    config: CatalogConfig,
}

impl DocumentsService {
    pub fn new(store: Arc<dyn LibraryStore>, config: CatalogConfig) -> Self {
        Self { store, config }
    }

    /// Reject categories outside the deployment's set (any category when the set is empty)
    fn check_category(&self, category: &str) -> AppResult<()> {
        if self.config.categories.is_empty() || self.config.categories.iter().any(|c| c == category) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Unknown category '{}', expected one of: {}",
                category,
                self.config.categories.join(", ")
            )))
        }
    }

    pub async fn list(&self, query: &SearchQuery) -> AppResult<Vec<Document>> {
        self.store.list_documents(query).await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Document> {
        self.store.get_document(id).await
    }

    pub async fn create(&self, data: &CreateDocument) -> AppResult<Document> {
        data.validate()?;
        self.check_category(&data.category)?;
        let document = self.store.create_document(data).await?;
        tracing::info!("Document created: id={} title={:?}", document.id, document.title);
        Ok(document)
    }

    /// Apply the provided fields; an empty update returns the stored document
    pub async fn update(&self, id: &str, data: &UpdateDocument) -> AppResult<Document> {
        if data.is_empty() {
            return self.store.get_document(id).await;
        }
        data.validate()?;
        if let Some(ref category) = data.category {
            self.check_category(category)?;
        }
        self.store.update_document(id, data).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete_document(id).await?;
        tracing::info!("Document deleted: id={}", id);
        Ok(())
    }
}

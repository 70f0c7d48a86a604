//! Subscriber management service

use std::sync::Arc;

use chrono::Local;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        subscriber::{CreateSubscriber, Subscriber, UpdateSubscriber},
        SearchQuery,
    },
    repository::LibraryStore,
};

#[derive(Clone)]
pub struct SubscribersService {
    store: Arc<dyn LibraryStore>,
}

impl SubscribersService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: &SearchQuery) -> AppResult<Vec<Subscriber>> {
        self.store.list_subscribers(query).await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Subscriber> {
        self.store.get_subscriber(id).await
    }

    /// Register a new subscriber, dated today
    pub async fn create(&self, data: &CreateSubscriber) -> AppResult<Subscriber> {
        data.validate()?;
        let subscriber = self
            .store
            .create_subscriber(data, Local::now().date_naive())
            .await?;
        tracing::info!("Subscriber created: id={}", subscriber.id);
        Ok(subscriber)
    }

    /// Apply the provided fields; an empty update returns the stored subscriber
    pub async fn update(&self, id: &str, data: &UpdateSubscriber) -> AppResult<Subscriber> {
        if data.is_empty() {
            return self.store.get_subscriber(id).await;
        }
        data.validate()?;
        self.store.update_subscriber(id, data).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete_subscriber(id).await?;
        tracing::info!("Subscriber deleted: id={}", id);
        Ok(())
    }
}

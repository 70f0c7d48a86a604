//! Business logic services

pub mod availability;
pub mod documents;
pub mod loans;
pub mod stats;
pub mod subscribers;

use std::sync::Arc;

use crate::{config::AppConfig, repository::LibraryStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn LibraryStore>,
    pub subscribers: subscribers::SubscribersService,
    pub documents: documents::DocumentsService,
    pub loans: loans::LoansService,
    pub availability: availability::AvailabilityService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services on top of the given record store
    pub fn new(store: Arc<dyn LibraryStore>, config: &AppConfig) -> Self {
        Self {
            subscribers: subscribers::SubscribersService::new(store.clone()),
            documents: documents::DocumentsService::new(store.clone(), config.catalog.clone()),
            loans: loans::LoansService::new(store.clone(), config.loans.clone()),
            availability: availability::AvailabilityService::new(
                store.clone(),
                config.loans.availability_policy,
            ),
            stats: stats::StatsService::new(store.clone()),
            store,
        }
    }
}

//! Shared application state
//!
//! Este módulo define la fachada que cablea los lifecycle managers sobre
//! un mismo store; es lo que la capa de presentación recibiría.

use std::sync::Arc;

use crate::config::MarketplaceConfig;
use crate::services::{BookingService, ListingService, NotificationService, VerificationService};
use crate::store::RecordStore;

#[derive(Clone)]
pub struct Marketplace {
    pub config: MarketplaceConfig,
    pub store: Arc<dyn RecordStore>,
    pub listings: ListingService,
    pub bookings: BookingService,
    pub verification: VerificationService,
    pub notifications: NotificationService,
}

impl Marketplace {
    pub fn new(store: Arc<dyn RecordStore>, config: MarketplaceConfig) -> Self {
        let notifications = NotificationService::new(Arc::clone(&store), &config);
        Self {
            listings: ListingService::new(Arc::clone(&store), notifications.clone()),
            bookings: BookingService::new(Arc::clone(&store), notifications.clone(), &config),
            verification: VerificationService::new(Arc::clone(&store), notifications.clone()),
            notifications,
            store,
            config,
        }
    }

    /// Fachada con la configuración por defecto (comisión 10%,
    /// rechazo de solapes y notificación de bookings activados)
    pub fn with_defaults(store: Arc<dyn RecordStore>) -> Self {
        Self::new(store, MarketplaceConfig::default())
    }
}

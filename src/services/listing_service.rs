//! Listing Lifecycle Manager
//!
//! Máquina de estados del anuncio de vehículo: `PendingApproval` al
//! publicarse y una única decisión de admin hacia `Approved` o `Denied`,
//! nunca hacia atrás. Consulta el Verification Gate antes de permitir la
//! publicación.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::models::notification::NotificationKind;
use crate::models::vehicle::{CreateListingRequest, VehicleListing, VehicleStatus};
use crate::services::load_user;
use crate::services::notification_service::NotificationService;
use crate::store::{filter, from_record, to_record, Collection, OrderBy, RecordStore};
use crate::utils::errors::AppError;

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn RecordStore>,
    notifier: NotificationService,
}

impl ListingService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: NotificationService) -> Self {
        Self { store, notifier }
    }

    /// Publica un anuncio nuevo en `PendingApproval`.
    ///
    /// El owner debe existir y tener la verificación de identidad aprobada;
    /// la creación no emite notificación (solo las decisiones lo hacen).
    pub async fn submit_listing(
        &self,
        owner_id: Uuid,
        request: CreateListingRequest,
    ) -> Result<VehicleListing, AppError> {
        request.validate()?;
        let year = request.parsed_year().ok_or_else(|| {
            AppError::Validation("year: year must be a 4-digit number".into())
        })?;

        let owner = load_user(&self.store, owner_id).await?;
        if !owner.is_verified() {
            return Err(AppError::Permission(
                "owner identity is not verified; verification must be approved before listing vehicles"
                    .into(),
            ));
        }

        let listing = VehicleListing {
            id: Uuid::new_v4(),
            owner_id,
            model: request.model,
            vehicle_type: request.vehicle_type,
            year,
            mileage: request.mileage,
            engine: request.engine,
            color: request.color,
            seats: request.seats,
            fuel_type: request.fuel_type,
            transmission: request.transmission,
            daily_rate: request.daily_rate,
            image_ref: request.image_ref,
            description: request.description,
            location: request.location,
            status: VehicleStatus::PendingApproval,
            created_at: Utc::now(),
        };
        self.store
            .create(Collection::Vehicles, to_record(&listing)?)
            .await?;
        info!(listing_id = %listing.id, owner_id = %owner_id, "listing submitted for approval");
        Ok(listing)
    }

    pub async fn approve_listing(&self, listing_id: Uuid) -> Result<VehicleListing, AppError> {
        self.decide(listing_id, VehicleStatus::Approved).await
    }

    pub async fn deny_listing(&self, listing_id: Uuid) -> Result<VehicleListing, AppError> {
        self.decide(listing_id, VehicleStatus::Denied).await
    }

    /// Decisión de admin sobre un anuncio pendiente.
    ///
    /// La transición se commitea primero; si el paso de notificación falla
    /// después de los reintentos se loguea y se tolera, nunca se revierte.
    async fn decide(
        &self,
        listing_id: Uuid,
        decision: VehicleStatus,
    ) -> Result<VehicleListing, AppError> {
        let record = self
            .store
            .get(Collection::Vehicles, listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("listing {} not found", listing_id)))?;
        let mut listing: VehicleListing = from_record(record)?;

        if listing.status != VehicleStatus::PendingApproval {
            return Err(AppError::InvalidTransition(
                "listing is no longer pending approval".into(),
            ));
        }

        self.store
            .update(
                Collection::Vehicles,
                listing_id,
                serde_json::json!({ "status": to_record(&decision)? }),
            )
            .await?;
        listing.status = decision;
        info!(listing_id = %listing_id, status = ?decision, "listing decision recorded");

        let (title, message, kind) = match decision {
            VehicleStatus::Approved => (
                "Listing approved",
                format!("Your {} listing is now live on the marketplace.", listing.model),
                NotificationKind::ListingApproved,
            ),
            _ => (
                "Listing denied",
                format!("Your {} listing was not approved.", listing.model),
                NotificationKind::ListingDenied,
            ),
        };
        if let Err(error) = self
            .notifier
            .notify(listing.owner_id, title, message, kind)
            .await
        {
            warn!(listing_id = %listing_id, "listing decision committed but owner notification failed: {}", error);
        }

        Ok(listing)
    }

    /// Borra un anuncio; solo el owner puede, y nunca con bookings activos
    pub async fn delete_listing(
        &self,
        listing_id: Uuid,
        requester_id: Uuid,
    ) -> Result<(), AppError> {
        let record = self
            .store
            .get(Collection::Vehicles, listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("listing {} not found", listing_id)))?;
        let listing: VehicleListing = from_record(record)?;

        if listing.owner_id != requester_id {
            return Err(AppError::Permission(
                "only the listing owner may delete it".into(),
            ));
        }

        let vehicle = listing_id.to_string();
        let active = self
            .store
            .query(
                Collection::Bookings,
                filter(move |r| r["vehicle_id"] == vehicle.as_str() && r["status"] == "confirmed"),
                None,
            )
            .await?;
        if !active.is_empty() {
            return Err(AppError::InvalidTransition(
                "listing has confirmed bookings and cannot be deleted".into(),
            ));
        }

        self.store.delete(Collection::Vehicles, listing_id).await?;
        info!(listing_id = %listing_id, "listing deleted by owner");
        Ok(())
    }

    /// Cola de moderación del admin, más antiguos primero
    pub async fn pending_listings(&self) -> Result<Vec<VehicleListing>, AppError> {
        let records = self
            .store
            .query(
                Collection::Vehicles,
                filter(|r| r["status"] == "pending_approval"),
                Some(OrderBy::asc("created_at")),
            )
            .await?;
        records.into_iter().map(from_record).collect()
    }

    pub async fn listings_for_owner(&self, owner_id: Uuid) -> Result<Vec<VehicleListing>, AppError> {
        let owner = owner_id.to_string();
        let records = self
            .store
            .query(
                Collection::Vehicles,
                filter(move |r| r["owner_id"] == owner.as_str()),
                Some(OrderBy::desc("created_at")),
            )
            .await?;
        records.into_iter().map(from_record).collect()
    }
}

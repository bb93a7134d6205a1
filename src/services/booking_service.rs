//! Booking Lifecycle Manager
//!
//! Máquina de estados del booking y cálculo del split financiero. Un
//! booking nace `Confirmed` tras el pago simulado; `Cancelled` y
//! `Completed` son terminales. La exclusividad de fechas por vehículo se
//! impone por política (`reject_overlapping_bookings`), no por el store.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::MarketplaceConfig;
use crate::models::booking::{Booking, BookingStatus, CreateBookingRequest, Quote};
use crate::models::notification::NotificationKind;
use crate::models::vehicle::{VehicleListing, VehicleStatus};
use crate::services::load_user;
use crate::services::notification_service::NotificationService;
use crate::store::{filter, from_record, to_record, Collection, OrderBy, RecordStore};
use crate::utils::errors::AppError;

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn RecordStore>,
    notifier: NotificationService,
    commission_rate: Decimal,
    reject_overlapping: bool,
    notify_owner_on_booking: bool,
}

impl BookingService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: NotificationService,
        config: &MarketplaceConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            commission_rate: config.commission_rate,
            reject_overlapping: config.reject_overlapping_bookings,
            notify_owner_on_booking: config.notify_owner_on_booking,
        }
    }

    /// Cotiza un alquiler. Función pura: días completos entre las fechas,
    /// al menos uno, por la tarifa diaria del vehículo.
    pub fn quote(
        vehicle: &VehicleListing,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Quote, AppError> {
        let rental_days = (end - start).num_days();
        if rental_days < 1 {
            return Err(AppError::Validation(
                "end date must be at least one day after start date".into(),
            ));
        }
        Ok(Quote {
            rental_days,
            total_price: Decimal::from(rental_days) * vehicle.daily_rate,
        })
    }

    /// Crea un booking `Confirmed` con el split comisión/payout calculado.
    ///
    /// El pago se simula exitoso, por eso no existe `PendingPayment`. El
    /// payout se deriva por resta para que `payout + commission` sume el
    /// total exacto a precisión de moneda.
    pub async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking, AppError> {
        request.validate()?;
        let pickup_time = request
            .pickup_time
            .ok_or_else(|| AppError::Validation("pickup_time: pickup time is required".into()))?;
        let dropoff_time = request
            .dropoff_time
            .ok_or_else(|| AppError::Validation("dropoff_time: drop-off time is required".into()))?;

        load_user(&self.store, request.renter_id).await?;

        let record = self
            .store
            .get(Collection::Vehicles, request.vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("vehicle {} not found", request.vehicle_id))
            })?;
        let vehicle: VehicleListing = from_record(record)?;
        if vehicle.status != VehicleStatus::Approved {
            return Err(AppError::InvalidTransition(
                "vehicle is not approved for rental".into(),
            ));
        }

        let quote = Self::quote(&vehicle, request.start_date, request.end_date)?;

        if self.reject_overlapping {
            let conflicts = self
                .confirmed_bookings_for_vehicle(vehicle.id)
                .await?
                .into_iter()
                .any(|existing| existing.overlaps(request.start_date, request.end_date));
            if conflicts {
                return Err(AppError::Validation(
                    "vehicle is already booked for the selected dates".into(),
                ));
            }
        }

        let commission = (quote.total_price * self.commission_rate).round_dp(2);
        let owner_payout = quote.total_price - commission;

        let booking = Booking {
            id: Uuid::new_v4(),
            renter_id: request.renter_id,
            vehicle_id: vehicle.id,
            vehicle_name: vehicle.model.clone(),
            vehicle_image: vehicle.image_ref.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            pickup_time,
            dropoff_time,
            rental_days: quote.rental_days,
            total_price: quote.total_price,
            commission,
            owner_payout,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
            cancelled_at: None,
        };
        self.store
            .create(Collection::Bookings, to_record(&booking)?)
            .await?;
        info!(
            booking_id = %booking.id,
            vehicle_id = %vehicle.id,
            rental_days = booking.rental_days,
            total = %booking.total_price,
            "booking confirmed"
        );

        if self.notify_owner_on_booking {
            if let Err(error) = self
                .notifier
                .notify(
                    vehicle.owner_id,
                    "New booking",
                    format!(
                        "Your {} was booked from {} to {}.",
                        vehicle.model, booking.start_date, booking.end_date
                    ),
                    NotificationKind::BookingCreated,
                )
                .await
            {
                warn!(booking_id = %booking.id, "booking committed but owner notification failed: {}", error);
            }
        }

        Ok(booking)
    }

    /// Cancela un booking confirmado; renter o admin solamente
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Booking, AppError> {
        let mut booking = self.load_booking(booking_id).await?;

        let requester = load_user(&self.store, requester_id).await?;
        if requester.id != booking.renter_id && !requester.is_admin() {
            return Err(AppError::Permission(
                "only the renter or an admin may cancel a booking".into(),
            ));
        }
        if booking.status != BookingStatus::Confirmed {
            return Err(AppError::InvalidTransition(
                "only confirmed bookings can be cancelled".into(),
            ));
        }

        let cancelled_at = Utc::now();
        self.store
            .update(
                Collection::Bookings,
                booking_id,
                serde_json::json!({
                    "status": to_record(&BookingStatus::Cancelled)?,
                    "cancelled_at": to_record(&cancelled_at)?,
                }),
            )
            .await?;
        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(cancelled_at);
        info!(booking_id = %booking_id, "booking cancelled");

        // El anuncio puede haber sido borrado; en ese caso no hay a quién avisar
        if let Some(record) = self.store.get(Collection::Vehicles, booking.vehicle_id).await? {
            let vehicle: VehicleListing = from_record(record)?;
            if let Err(error) = self
                .notifier
                .notify(
                    vehicle.owner_id,
                    "Booking cancelled",
                    format!(
                        "The booking of your {} from {} to {} was cancelled.",
                        vehicle.model, booking.start_date, booking.end_date
                    ),
                    NotificationKind::BookingCancelled,
                )
                .await
            {
                warn!(booking_id = %booking_id, "cancellation committed but owner notification failed: {}", error);
            }
        }

        Ok(booking)
    }

    /// Transición de sistema `Confirmed → Completed`
    pub async fn complete_booking(&self, booking_id: Uuid) -> Result<Booking, AppError> {
        let mut booking = self.load_booking(booking_id).await?;
        if booking.status != BookingStatus::Confirmed {
            return Err(AppError::InvalidTransition(
                "only confirmed bookings can be completed".into(),
            ));
        }

        self.store
            .update(
                Collection::Bookings,
                booking_id,
                serde_json::json!({ "status": to_record(&BookingStatus::Completed)? }),
            )
            .await?;
        booking.status = BookingStatus::Completed;
        info!(booking_id = %booking_id, "booking completed");

        if let Err(error) = self
            .notifier
            .notify(
                booking.renter_id,
                "Rental completed",
                format!("Your rental of {} is complete.", booking.vehicle_name),
                NotificationKind::BookingCompleted,
            )
            .await
        {
            warn!(booking_id = %booking_id, "completion committed but renter notification failed: {}", error);
        }

        Ok(booking)
    }

    /// Barrido periódico: completa todo booking confirmado cuyo período
    /// terminó antes de `now`. Devuelve cuántos completó.
    pub async fn complete_due_bookings(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let today = now.date_naive();
        let records = self
            .store
            .query(
                Collection::Bookings,
                filter(|r| r["status"] == "confirmed"),
                None,
            )
            .await?;

        let mut completed = 0;
        for record in records {
            let booking: Booking = from_record(record)?;
            if booking.end_date < today {
                self.complete_booking(booking.id).await?;
                completed += 1;
            }
        }
        if completed > 0 {
            info!(completed, "completion sweep finished");
        }
        Ok(completed)
    }

    /// Borra un booking terminal; los confirmados no se borran, se cancelan
    pub async fn delete_booking(
        &self,
        booking_id: Uuid,
        requester_id: Uuid,
    ) -> Result<(), AppError> {
        let booking = self.load_booking(booking_id).await?;

        let requester = load_user(&self.store, requester_id).await?;
        if requester.id != booking.renter_id && !requester.is_admin() {
            return Err(AppError::Permission(
                "only the renter or an admin may delete a booking".into(),
            ));
        }
        if !booking.status.is_terminal() {
            return Err(AppError::InvalidTransition(
                "confirmed bookings cannot be deleted; cancel first".into(),
            ));
        }

        self.store.delete(Collection::Bookings, booking_id).await
    }

    pub async fn bookings_for_renter(&self, renter_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let renter = renter_id.to_string();
        let records = self
            .store
            .query(
                Collection::Bookings,
                filter(move |r| r["renter_id"] == renter.as_str()),
                Some(OrderBy::desc("created_at")),
            )
            .await?;
        records.into_iter().map(from_record).collect()
    }

    pub async fn bookings_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let vehicle = vehicle_id.to_string();
        let records = self
            .store
            .query(
                Collection::Bookings,
                filter(move |r| r["vehicle_id"] == vehicle.as_str()),
                Some(OrderBy::desc("created_at")),
            )
            .await?;
        records.into_iter().map(from_record).collect()
    }

    async fn confirmed_bookings_for_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<Booking>, AppError> {
        let vehicle = vehicle_id.to_string();
        let records = self
            .store
            .query(
                Collection::Bookings,
                filter(move |r| r["vehicle_id"] == vehicle.as_str() && r["status"] == "confirmed"),
                None,
            )
            .await?;
        records.into_iter().map(from_record).collect()
    }

    async fn load_booking(&self, booking_id: Uuid) -> Result<Booking, AppError> {
        let record = self
            .store
            .get(Collection::Bookings, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("booking {} not found", booking_id)))?;
        from_record(record)
    }
}

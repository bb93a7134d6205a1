//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking, el request de creación y la
//! cotización. Un booking nace `Confirmed` (el pago se simula exitoso, no
//! existe estado `PendingPayment`); `Cancelled` y `Completed` son terminales
//! y nunca se mutan de nuevo.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Estado del booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Confirmed)
    }
}

/// Booking - mapea al documento de la colección `bookings`.
/// Nombre e imagen del vehículo van denormalizados para el display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub renter_id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_name: String,
    pub vehicle_image: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pickup_time: NaiveTime,
    pub dropoff_time: NaiveTime,
    pub rental_days: i64,
    pub total_price: Decimal,
    pub commission: Decimal,
    pub owner_payout: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// True si el rango de fechas intersecta `[start, end)` de otro booking
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date < end && start < self.end_date
    }
}

/// Cotización de un alquiler - cálculo puro, sin efectos
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Quote {
    pub rental_days: i64,
    pub total_price: Decimal,
}

/// Request para crear un booking
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub renter_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[validate(required(message = "pickup time is required"))]
    pub pickup_time: Option<NaiveTime>,

    #[validate(required(message = "drop-off time is required"))]
    pub dropoff_time: Option<NaiveTime>,
}

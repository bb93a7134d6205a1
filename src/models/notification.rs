//! Modelo de Notification
//!
//! Registros append-only salvo el flag `read`, que solo transiciona
//! false → true.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tipo de notificación - tag para que la UI agrupe y enrute
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ListingApproved,
    ListingDenied,
    BookingCreated,
    BookingCancelled,
    BookingCompleted,
    VerificationApproved,
    VerificationDenied,
}

/// Notification - mapea al documento de la colección `notifications`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

//! Modelo de VehicleListing
//!
//! Este módulo contiene el struct VehicleListing y el request de creación
//! con sus reglas de validación. El estado arranca en `PendingApproval` y
//! solo una decisión de admin lo mueve, exactamente una vez.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::YEAR_RE;

/// Estado del anuncio de vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    PendingApproval,
    Approved,
    Denied,
}

impl VehicleStatus {
    /// `Approved` y `Denied` son terminales desde la perspectiva del admin
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VehicleStatus::PendingApproval)
    }
}

/// VehicleListing - mapea al documento de la colección `vehicles`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleListing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub model: String,
    pub vehicle_type: String,
    pub year: i32,
    pub mileage: i64,
    pub engine: String,
    pub color: String,
    pub seats: i32,
    pub fuel_type: String,
    pub transmission: String,
    pub daily_rate: Decimal,
    pub image_ref: String,
    pub description: Option<String>,
    pub location: String,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

/// Request para publicar un nuevo anuncio
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 100, message = "model is required"))]
    pub model: String,

    #[validate(length(min = 1, max = 50, message = "vehicle type is required"))]
    pub vehicle_type: String,

    /// El año llega como string del formulario y se valida a 4 dígitos
    #[validate(regex(path = "YEAR_RE", message = "year must be a 4-digit number"))]
    pub year: String,

    #[validate(range(min = 0, message = "mileage must not be negative"))]
    pub mileage: i64,

    #[validate(length(min = 1, max = 50, message = "engine is required"))]
    pub engine: String,

    #[validate(length(min = 1, max = 50, message = "color is required"))]
    pub color: String,

    #[validate(range(min = 1, max = 60, message = "seat count must be between 1 and 60"))]
    pub seats: i32,

    #[validate(length(min = 1, max = 20, message = "fuel type is required"))]
    pub fuel_type: String,

    #[validate(length(min = 1, max = 20, message = "transmission is required"))]
    pub transmission: String,

    #[validate(custom = "crate::utils::validation::validate_positive_decimal")]
    pub daily_rate: Decimal,

    #[validate(length(min = 1, max = 500, message = "image reference is required"))]
    pub image_ref: String,

    pub description: Option<String>,

    #[validate(length(min = 1, max = 200, message = "location is required"))]
    pub location: String,
}

impl CreateListingRequest {
    /// Año ya validado contra `YEAR_RE`; el parse no puede fallar después
    /// de `validate()`, pero se propaga igualmente como error de validación.
    pub fn parsed_year(&self) -> Option<i32> {
        self.year.parse().ok()
    }
}

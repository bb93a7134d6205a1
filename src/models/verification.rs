//! Modelo de VerificationRequest
//!
//! Solicitud de verificación de identidad de un owner. Conceptualmente una
//! por owner a la vez; el store no impone unicidad. El registro se elimina
//! al decidirse, así que en la práctica siempre se persiste `Pending`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::VerificationStatus;

/// VerificationRequest - mapea al documento de `verificationRequests`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub license_number: String,
    pub status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

/// Request para solicitar verificación de identidad
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequestVerificationRequest {
    #[validate(custom = "crate::utils::validation::validate_not_empty", length(max = 100))]
    pub full_name: String,

    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    #[validate(custom = "crate::utils::validation::validate_not_empty", length(max = 50))]
    pub license_number: String,
}

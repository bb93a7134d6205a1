//! Modelo de User
//!
//! Los usuarios pertenecen al proveedor de auth externo; el core solo los
//! lee (rol, estado de verificación) y actualiza el flag de verificación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rol del usuario - un solo string de rol, sin modelo de permisos
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Owner,
    Renter,
}

/// Estado de verificación de identidad del owner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Unverified,
    Pending,
    Approved,
    Denied,
}

/// User - mapea al documento de la colección `users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            email: email.into(),
            role,
            verification_status: VerificationStatus::Unverified,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Approved
    }
}

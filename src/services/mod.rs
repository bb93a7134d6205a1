//! Services module
//!
//! Este módulo contiene la lógica de negocio del marketplace: los lifecycle
//! managers son stateless, derivan todo del estado del store por llamada.

pub mod booking_service;
pub mod listing_service;
pub mod notification_service;
pub mod verification_service;

pub use booking_service::BookingService;
pub use listing_service::ListingService;
pub use notification_service::NotificationService;
pub use verification_service::VerificationService;

use std::sync::Arc;

use uuid::Uuid;

use crate::models::user::User;
use crate::store::{from_record, Collection, RecordStore};
use crate::utils::errors::AppError;

/// Carga un usuario del store o falla con NotFound
pub(crate) async fn load_user(
    store: &Arc<dyn RecordStore>,
    user_id: Uuid,
) -> Result<User, AppError> {
    let record = store
        .get(Collection::Users, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))?;
    from_record(record)
}

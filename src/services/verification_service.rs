//! Verification Gate
//!
//! Verificación de identidad del owner. La solicitud queda `Pending` y
//! mueve el flag del usuario a `Pending`; la decisión de admin aprueba el
//! flag (o lo deja intacto en denegación) y elimina la solicitud.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::models::notification::NotificationKind;
use crate::models::user::VerificationStatus;
use crate::models::verification::{RequestVerificationRequest, VerificationRequest};
use crate::services::load_user;
use crate::services::notification_service::NotificationService;
use crate::store::{from_record, to_record, Collection, RecordStore};
use crate::utils::errors::AppError;

#[derive(Clone)]
pub struct VerificationService {
    store: Arc<dyn RecordStore>,
    notifier: NotificationService,
}

impl VerificationService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: NotificationService) -> Self {
        Self { store, notifier }
    }

    /// Crea una solicitud `Pending` y marca al owner como pendiente
    pub async fn request_verification(
        &self,
        owner_id: Uuid,
        request: RequestVerificationRequest,
    ) -> Result<VerificationRequest, AppError> {
        request.validate()?;
        load_user(&self.store, owner_id).await?;

        let verification = VerificationRequest {
            id: Uuid::new_v4(),
            owner_id,
            full_name: request.full_name,
            email: request.email,
            license_number: request.license_number,
            status: VerificationStatus::Pending,
            created_at: Utc::now(),
        };
        self.store
            .create(Collection::VerificationRequests, to_record(&verification)?)
            .await?;
        self.store
            .update(
                Collection::Users,
                owner_id,
                serde_json::json!({
                    "verification_status": to_record(&VerificationStatus::Pending)?
                }),
            )
            .await?;
        info!(owner_id = %owner_id, request_id = %verification.id, "verification requested");
        Ok(verification)
    }

    /// Decisión de admin. Aprobar fija `verification_status = Approved` en
    /// el usuario; denegar deja el flag como estaba. En ambos casos la
    /// solicitud se elimina y el owner recibe el aviso.
    pub async fn decide(&self, request_id: Uuid, approve: bool) -> Result<(), AppError> {
        let record = self
            .store
            .get(Collection::VerificationRequests, request_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("verification request {} not found", request_id))
            })?;
        let verification: VerificationRequest = from_record(record)?;

        if approve {
            self.store
                .update(
                    Collection::Users,
                    verification.owner_id,
                    serde_json::json!({
                        "verification_status": to_record(&VerificationStatus::Approved)?
                    }),
                )
                .await?;
        }
        self.store
            .delete(Collection::VerificationRequests, request_id)
            .await?;
        info!(request_id = %request_id, approve, "verification decided");

        let (title, message, kind) = if approve {
            (
                "Identity verified",
                "Your identity was verified. You can now list vehicles.".to_string(),
                NotificationKind::VerificationApproved,
            )
        } else {
            (
                "Verification denied",
                "Your identity verification was denied.".to_string(),
                NotificationKind::VerificationDenied,
            )
        };
        if let Err(error) = self
            .notifier
            .notify(verification.owner_id, title, message, kind)
            .await
        {
            warn!(request_id = %request_id, "verification decided but owner notification failed: {}", error);
        }

        Ok(())
    }
}

//! Notification Dispatcher
//!
//! Emite los registros de notificación que consumen owners, admins y
//! renters. El append contra el store se reintenta acotado porque es el
//! segundo paso de los workflows de dos registros; marcar como leído es
//! idempotente.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::config::MarketplaceConfig;
use crate::models::notification::{Notification, NotificationKind};
use crate::store::{filter, from_record, to_record, Collection, OrderBy, RecordStore};
use crate::utils::errors::AppError;
use crate::utils::retry::with_retry;

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn RecordStore>,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl NotificationService {
    pub fn new(store: Arc<dyn RecordStore>, config: &MarketplaceConfig) -> Self {
        Self {
            store,
            retry_attempts: config.store_retry_attempts,
            retry_backoff: config.store_retry_backoff,
        }
    }

    /// Agrega una notificación no leída para el destinatario
    pub async fn notify(
        &self,
        recipient_id: Uuid,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Result<Notification, AppError> {
        let notification = Notification {
            id: Uuid::new_v4(),
            recipient_id,
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            created_at: Utc::now(),
        };
        let record = to_record(&notification)?;

        with_retry(self.retry_attempts, self.retry_backoff, || {
            let record = record.clone();
            async move { self.store.create(Collection::Notifications, record).await }
        })
        .await?;

        Ok(notification)
    }

    /// Marca una notificación como leída; releer una ya leída es un no-op
    pub async fn mark_read(&self, notification_id: Uuid) -> Result<(), AppError> {
        let record = self
            .store
            .get(Collection::Notifications, notification_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("notification {} not found", notification_id))
            })?;
        let notification: Notification = from_record(record)?;
        if notification.read {
            return Ok(());
        }
        self.store
            .update(
                Collection::Notifications,
                notification_id,
                serde_json::json!({ "read": true }),
            )
            .await
    }

    /// Marca todas las no leídas del destinatario; idempotente
    pub async fn mark_all_read(&self, recipient_id: Uuid) -> Result<usize, AppError> {
        let recipient = recipient_id.to_string();
        let unread = self
            .store
            .query(
                Collection::Notifications,
                filter(move |r| r["recipient_id"] == recipient.as_str() && r["read"] == false),
                None,
            )
            .await?;

        let mut marked = 0;
        for record in unread {
            let notification: Notification = from_record(record)?;
            self.store
                .update(
                    Collection::Notifications,
                    notification.id,
                    serde_json::json!({ "read": true }),
                )
                .await?;
            marked += 1;
        }
        Ok(marked)
    }

    /// Notificaciones del destinatario, más recientes primero
    pub async fn notifications_for(
        &self,
        recipient_id: Uuid,
    ) -> Result<Vec<Notification>, AppError> {
        let recipient = recipient_id.to_string();
        let records = self
            .store
            .query(
                Collection::Notifications,
                filter(move |r| r["recipient_id"] == recipient.as_str()),
                Some(OrderBy::desc("created_at")),
            )
            .await?;
        records.into_iter().map(from_record).collect()
    }

    pub async fn unread_count(&self, recipient_id: Uuid) -> Result<usize, AppError> {
        let recipient = recipient_id.to_string();
        let records = self
            .store
            .query(
                Collection::Notifications,
                filter(move |r| r["recipient_id"] == recipient.as_str() && r["read"] == false),
                None,
            )
            .await?;
        Ok(records.len())
    }
}

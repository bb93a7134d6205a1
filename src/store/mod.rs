//! Record Store Adapter
//!
//! Este módulo define el contrato contra el document store externo
//! (colecciones nombradas con create/read/update/delete/subscribe). El core
//! solo depende de este trait; la base de datos gestionada real vive detrás
//! de un adapter de la capa de integración. `memory::MemoryStore` es la
//! implementación de referencia usada por la suite de tests.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Colecciones nombradas del store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Vehicles,
    Bookings,
    VerificationRequests,
    Notifications,
}

impl Collection {
    /// Nombre de la colección tal como existe en el store gestionado
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Vehicles => "vehicles",
            Collection::Bookings => "bookings",
            Collection::VerificationRequests => "verificationRequests",
            Collection::Notifications => "notifications",
        }
    }
}

/// Documento JSON tal como lo persiste el store
pub type Record = serde_json::Value;

/// Predicado de filtrado para queries y suscripciones
pub type Filter = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Construye un [`Filter`] a partir de un closure
pub fn filter<F>(predicate: F) -> Filter
where
    F: Fn(&Record) -> bool + Send + Sync + 'static,
{
    Arc::new(predicate)
}

/// Ordenamiento opcional de una query
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Evento push de una suscripción
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    Added { id: Uuid, record: Record },
    Updated { id: Uuid, record: Record },
    Removed { id: Uuid, record: Record },
}

impl ChangeEvent {
    pub fn record(&self) -> &Record {
        match self {
            ChangeEvent::Added { record, .. }
            | ChangeEvent::Updated { record, .. }
            | ChangeEvent::Removed { record, .. } => record,
        }
    }
}

/// Callback invocado por cada add/update/remove que matchea el filtro
pub type ChangeCallback = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Handle devuelto por `subscribe`; se entrega a `unsubscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub(crate) u64);

/// Contrato del store externo. Atomicidad por documento solamente: no se
/// asume transacción multi-documento, los fallos salen como
/// [`AppError::Dependency`] y nunca se tragan como éxito.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserta un documento; respeta el campo `id` si viene en el record
    async fn create(&self, collection: Collection, record: Record) -> Result<Uuid, AppError>;

    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Record>, AppError>;

    /// Merge-patch de campos parciales sobre un documento existente
    async fn update(&self, collection: Collection, id: Uuid, patch: Record)
        -> Result<(), AppError>;

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), AppError>;

    async fn query(
        &self,
        collection: Collection,
        predicate: Filter,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Record>, AppError>;

    async fn subscribe(
        &self,
        collection: Collection,
        predicate: Filter,
        callback: ChangeCallback,
    ) -> Result<SubscriptionHandle, AppError>;

    async fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), AppError>;
}

/// Serializa un modelo al documento JSON del store
pub fn to_record<T: Serialize>(value: &T) -> Result<Record, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Dependency(format!("failed to serialize record: {}", e)))
}

/// Deserializa un documento del store a su modelo
pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T, AppError> {
    serde_json::from_value(record)
        .map_err(|e| AppError::Dependency(format!("corrupt record in store: {}", e)))
}

/// Extrae el campo `id` de un documento
pub fn record_id(record: &Record) -> Result<Uuid, AppError> {
    record
        .get("id")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AppError::Dependency("record has no valid id field".into()))
}

//! Store en memoria
//!
//! Implementación de referencia del [`RecordStore`]: documentos JSON en
//! mapas bajo `tokio::sync::RwLock`, con suscripciones push síncronas.
//! Es el store de la suite de tests y de los entornos sin base de datos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{
    ChangeCallback, ChangeEvent, Collection, Filter, OrderBy, Record, RecordStore,
    SubscriptionHandle,
};
use crate::utils::errors::AppError;

struct Subscriber {
    handle: SubscriptionHandle,
    collection: Collection,
    predicate: Filter,
    callback: ChangeCallback,
}

/// [`RecordStore`] respaldado por memoria del proceso
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, HashMap<Uuid, Record>>>,
    subscribers: RwLock<Vec<Subscriber>>,
    next_subscription: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifica a los suscriptores cuyo filtro matchea el documento del evento
    async fn publish(&self, collection: Collection, event: ChangeEvent) {
        let subscribers = self.subscribers.read().await;
        for subscriber in subscribers.iter() {
            if subscriber.collection == collection && (subscriber.predicate)(event.record()) {
                (subscriber.callback)(&event);
            }
        }
    }
}

fn compare_fields(a: &Record, b: &Record, field: &str) -> std::cmp::Ordering {
    let left = a.get(field);
    let right = b.get(field);
    match (left, right) {
        (Some(l), Some(r)) => {
            if let (Some(l), Some(r)) = (l.as_f64(), r.as_f64()) {
                l.partial_cmp(&r).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                // timestamps RFC3339 y strings ordenan lexicográficamente
                l.to_string().cmp(&r.to_string())
            }
        }
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, collection: Collection, mut record: Record) -> Result<Uuid, AppError> {
        let id = match crate::store::record_id(&record) {
            Ok(id) => id,
            Err(_) => {
                let id = Uuid::new_v4();
                if let Some(object) = record.as_object_mut() {
                    object.insert("id".into(), serde_json::Value::String(id.to_string()));
                }
                id
            }
        };

        {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection)
                .or_default()
                .insert(id, record.clone());
        }
        self.publish(collection, ChangeEvent::Added { id, record }).await;
        Ok(id)
    }

    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Record>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|records| records.get(&id))
            .cloned())
    }

    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        patch: Record,
    ) -> Result<(), AppError> {
        let fields = patch
            .as_object()
            .ok_or_else(|| AppError::Dependency("update patch must be a JSON object".into()))?
            .clone();

        let updated = {
            let mut collections = self.collections.write().await;
            let record = collections
                .get_mut(&collection)
                .and_then(|records| records.get_mut(&id))
                .ok_or_else(|| {
                    AppError::NotFound(format!("{} record {} not found", collection.name(), id))
                })?;
            let object = record
                .as_object_mut()
                .ok_or_else(|| AppError::Dependency("stored record is not an object".into()))?;
            for (key, value) in fields {
                object.insert(key, value);
            }
            record.clone()
        };
        self.publish(collection, ChangeEvent::Updated { id, record: updated })
            .await;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), AppError> {
        let removed = {
            let mut collections = self.collections.write().await;
            collections
                .get_mut(&collection)
                .and_then(|records| records.remove(&id))
                .ok_or_else(|| {
                    AppError::NotFound(format!("{} record {} not found", collection.name(), id))
                })?
        };
        self.publish(collection, ChangeEvent::Removed { id, record: removed })
            .await;
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        predicate: Filter,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Record>, AppError> {
        let collections = self.collections.read().await;
        let mut matches: Vec<Record> = collections
            .get(&collection)
            .map(|records| {
                records
                    .values()
                    .filter(|record| predicate(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order_by {
            matches.sort_by(|a, b| {
                let ordering = compare_fields(a, b, &order.field);
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        Ok(matches)
    }

    async fn subscribe(
        &self,
        collection: Collection,
        predicate: Filter,
        callback: ChangeCallback,
    ) -> Result<SubscriptionHandle, AppError> {
        let handle = SubscriptionHandle(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        let mut subscribers = self.subscribers.write().await;
        subscribers.push(Subscriber {
            handle,
            collection,
            predicate,
            callback,
        });
        Ok(handle)
    }

    async fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), AppError> {
        let mut subscribers = self.subscribers.write().await;
        subscribers.retain(|subscriber| subscriber.handle != handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::store::filter;

    #[tokio::test]
    async fn test_create_assigns_id_when_missing() {
        let store = MemoryStore::new();
        let id = store
            .create(Collection::Notifications, json!({ "title": "hola" }))
            .await
            .expect("create");
        let record = store
            .get(Collection::Notifications, id)
            .await
            .expect("get")
            .expect("record present");
        assert_eq!(record["title"], "hola");
        assert_eq!(record["id"], id.to_string());
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let store = MemoryStore::new();
        let id = store
            .create(Collection::Vehicles, json!({ "model": "Corolla", "color": "red" }))
            .await
            .expect("create");
        store
            .update(Collection::Vehicles, id, json!({ "color": "blue" }))
            .await
            .expect("update");
        let record = store
            .get(Collection::Vehicles, id)
            .await
            .expect("get")
            .expect("record present");
        assert_eq!(record["model"], "Corolla");
        assert_eq!(record["color"], "blue");
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let result = store
            .update(Collection::Bookings, Uuid::new_v4(), json!({ "status": "cancelled" }))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_query_filters_and_orders() {
        let store = MemoryStore::new();
        for (model, year) in [("Corolla", 2020), ("Civic", 2024), ("Clio", 2022)] {
            store
                .create(Collection::Vehicles, json!({ "model": model, "year": year }))
                .await
                .expect("create");
        }
        let records = store
            .query(
                Collection::Vehicles,
                filter(|r| r["year"].as_i64().unwrap_or(0) >= 2021),
                Some(OrderBy::desc("year")),
            )
            .await
            .expect("query");
        let models: Vec<&str> = records.iter().filter_map(|r| r["model"].as_str()).collect();
        assert_eq!(models, vec!["Civic", "Clio"]);
    }

    #[tokio::test]
    async fn test_subscribe_receives_matching_events_until_unsubscribed() {
        let store = MemoryStore::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_cb = Arc::clone(&seen);
        let handle = store
            .subscribe(
                Collection::Bookings,
                filter(|r| r["status"] == "confirmed"),
                Arc::new(move |_event| {
                    seen_cb.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .expect("subscribe");

        store
            .create(Collection::Bookings, json!({ "status": "confirmed" }))
            .await
            .expect("create");
        store
            .create(Collection::Bookings, json!({ "status": "cancelled" }))
            .await
            .expect("create");
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        store.unsubscribe(handle).await.expect("unsubscribe");
        store
            .create(Collection::Bookings, json!({ "status": "confirmed" }))
            .await
            .expect("create");
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}

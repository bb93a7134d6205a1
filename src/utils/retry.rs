//! Reintentos acotados contra el store
//!
//! Los workflows de dos registros (transición + notificación) toleran
//! completación parcial: la transición nunca se revierte, el paso que falló
//! se reintenta aquí de forma independiente. Solo los fallos del adapter
//! (`AppError::Dependency`) son reintentables; el resto se propaga directo.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::utils::errors::AppError;

/// Ejecuta `operation` hasta `attempts` veces con backoff exponencial.
pub async fn with_retry<T, F, Fut>(
    attempts: u32,
    initial_backoff: Duration,
    mut operation: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt: u32 = 0;
    let mut backoff = initial_backoff;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(AppError::Dependency(message)) if attempt + 1 < attempts.max(1) => {
                attempt += 1;
                warn!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "store call failed, retrying: {}",
                    message
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
            }
            Err(error) => return Err(error),
        }
    }
}

//! Configuración de variables de entorno
//!
//! Este módulo maneja las políticas configurables del core. Todas tienen
//! default razonable; las variables de entorno solo las sobreescriben.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;

/// Configuración del marketplace
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Fracción del precio total que retiene la plataforma
    pub commission_rate: Decimal,
    /// Rechazar bookings `Confirmed` solapados del mismo vehículo
    pub reject_overlapping_bookings: bool,
    /// Notificar al owner cuando se crea un booking de su vehículo
    pub notify_owner_on_booking: bool,
    /// Intentos máximos contra el store para el paso de notificación
    pub store_retry_attempts: u32,
    /// Backoff inicial entre reintentos
    pub store_retry_backoff: Duration,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            commission_rate: Decimal::new(10, 2), // 0.10
            reject_overlapping_bookings: true,
            notify_owner_on_booking: true,
            store_retry_attempts: 3,
            store_retry_backoff: Duration::from_millis(100),
        }
    }
}

fn env_parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

impl MarketplaceConfig {
    /// Carga la configuración desde el entorno (con `.env` vía dotenvy)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Self {
            commission_rate: env_parsed("COMMISSION_RATE").unwrap_or(defaults.commission_rate),
            reject_overlapping_bookings: env_parsed("REJECT_OVERLAPPING_BOOKINGS")
                .unwrap_or(defaults.reject_overlapping_bookings),
            notify_owner_on_booking: env_parsed("NOTIFY_OWNER_ON_BOOKING")
                .unwrap_or(defaults.notify_owner_on_booking),
            store_retry_attempts: env_parsed("STORE_RETRY_ATTEMPTS")
                .unwrap_or(defaults.store_retry_attempts),
            store_retry_backoff: env_parsed("STORE_RETRY_BACKOFF_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_retry_backoff),
        }
    }
}

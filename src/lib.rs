//! Core de lifecycle del marketplace de alquiler de vehículos
//!
//! Lógica de negocio pura sobre un document store abstracto: la máquina de
//! estados de anuncios (aprobación de admin), la de bookings (con el split
//! comisión/payout), el gate de verificación de owners y el dispatcher de
//! notificaciones. Sin HTTP, sin UI, sin pasarela de pago.

pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

pub use config::MarketplaceConfig;
pub use state::Marketplace;
pub use utils::errors::AppError;

/// Inicializa el subscriber de tracing; inocuo si ya hay uno instalado
pub fn init_tracing() {
    tracing_subscriber::fmt().try_init().ok();
}

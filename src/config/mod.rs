//! Configuración de la aplicación

pub mod environment;

pub use environment::MarketplaceConfig;

//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y reintentos contra el store.

pub mod errors;
pub mod retry;
pub mod validation;

//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del core del marketplace.
//! Cada operación rechazada devuelve una variante específica con un mensaje
//! legible; ninguna operación falla en silencio.

use thiserror::Error;
use validator::ValidationErrors;

/// Errores principales del core
#[derive(Error, Debug)]
pub enum AppError {
    /// Input malformado o faltante - corregible por el usuario
    #[error("Validation error: {0}")]
    Validation(String),

    /// El actor no tiene autoridad para la operación
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Guard de la máquina de estados violado - vista obsoleta o race
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Registro referenciado ausente
    #[error("Not found: {0}")]
    NotFound(String),

    /// El store adapter falló - se reintenta acotado, nunca se traga
    #[error("Store error: {0}")]
    Dependency(String),
}

impl AppError {
    /// Código estable por variante, para logging y para la capa de presentación
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Permission(_) => "PERMISSION_DENIED",
            AppError::InvalidTransition(_) => "INVALID_TRANSITION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Dependency(_) => "STORE_ERROR",
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut parts: Vec<String> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let detail = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                parts.push(format!("{}: {}", field, detail));
            }
        }
        parts.sort();
        AppError::Validation(parts.join("; "))
    }
}

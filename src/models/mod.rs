//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! a los documentos de las colecciones del store.

pub mod booking;
pub mod notification;
pub mod user;
pub mod vehicle;
pub mod verification;

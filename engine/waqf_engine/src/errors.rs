//! Engine-wide error types.
//!
//! Business-rule outcomes (validation, contribution acceptance, completion)
//! are returned as plain result records, not errors. [`EngineError`] covers
//! faults at the edges: malformed wire data and operations that would leave
//! a persisted waqf in an impossible state.

use thiserror::Error;

use crate::types::WaqfStatus;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown waqf type: {0}")]
    UnknownWaqfType(String),

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: WaqfStatus, to: WaqfStatus },

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: f64, available: f64 },

    #[error("Waqf is not a consumable type")]
    NotConsumable,
}

pub type Result<T> = std::result::Result<T, EngineError>;

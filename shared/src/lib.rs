//! Shared types and models for the Part Total Price plugin
//!
//! This crate contains the money model and the per-part aggregation logic
//! shared between the backend service and the frontend renderer (via WASM).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;

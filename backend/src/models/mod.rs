//! Domain models for the Part Total Price service
//!
//! Re-exports models from the shared crate

pub use shared::models::*;

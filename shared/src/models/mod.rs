//! Domain models for the Part Total Price plugin

mod location;
mod panel;
mod part;
mod plugin;
mod stock;
mod valuation;

pub use location::*;
pub use panel::*;
pub use part::*;
pub use plugin::*;
pub use stock::*;
pub use valuation::*;

//! Business logic services for the Part Total Price service

pub mod panel;
pub mod valuation;

pub use panel::PanelService;
pub use valuation::ValuationService;

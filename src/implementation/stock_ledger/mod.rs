//! # Stock Ledger
//!
//! Single source of truth for stock validation and adjustment. Every
//! mutation of a product or variant stock counter in the crate goes through
//! this service.

mod service;


pub use service::{StockDirection, StockLedger, StockLine};

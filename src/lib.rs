//! # Commerce Core
//!
//! Implements the order and inventory consistency core of the commerce
//! platform: per-user carts with locked unit prices, stock validation and
//! adjustment, the order lifecycle state machine, and the background
//! reconciliation scheduler.

pub mod errors;
pub mod implementation;
pub mod types;

// Re-exports for public API
pub use implementation::CommerceCore;
pub use types::CommerceConfig;

//! # Order Scheduler
//!
//! Time-driven reconciliation of the order table: promotes paid pending
//! orders and cancels orders stuck unpaid for too long.

mod service;


pub use service::OrderScheduler;

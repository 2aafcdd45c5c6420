//! Core types shared across schemadiff facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: CycleId for tying a parse → diff → reconcile
//!   cycle together in logs and errors
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::CycleId;

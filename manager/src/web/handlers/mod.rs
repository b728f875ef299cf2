//! HTTP request handlers for the Handover Manager API.
//!
//! This module is organized by domain:
//! - `common` - Shared types, query structs, and utilities
//! - `handover` - Manual handover dispatch trigger
//! - `schedules` - CRUD operations for scheduled comments
//! - `settings` - Global settings and scheduler state
//! - `tickets` - Open ticket listing and ticket notes

pub mod common;
pub mod handover;
pub mod schedules;
pub mod settings;
pub mod tickets;

// Re-export all public handler functions for convenience
// Note: common module is internal, used only by sibling modules
pub use handover::*;
pub use schedules::*;
pub use settings::*;
pub use tickets::*;

//! Common structs for refund status history shared across crates.

mod event;
mod features;
mod metadata;

pub use event::*;
pub use features::*;
pub use metadata::*;

/// Terminal status marking a refund as available to the taxpayer.
pub const AVAILABLE_STATUS: &str = "AVAILABLE";

/// Model family identifier reported in metadata and responses.
pub const MODEL_NAME: &str = "gbrt";

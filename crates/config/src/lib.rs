//! Environment-backed configuration for the refund ETA service.

mod config;

pub use config::Config;

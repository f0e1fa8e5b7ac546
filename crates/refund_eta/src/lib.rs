//! Refund ETA Prediction Service
//!
//! Trains a gradient-boosted regressor on refund status transition history
//! and serves estimated days-until-available over HTTP.

pub mod api;
pub mod commands;
pub mod eta;
pub mod seed;
pub mod server;
pub mod trainer;

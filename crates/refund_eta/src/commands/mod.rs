//! CLI subcommand implementations.

pub mod predict;
pub mod seed;
pub mod serve;
pub mod train;

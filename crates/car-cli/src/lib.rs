//! CLI library components for the CaR viewer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
pub mod summary;

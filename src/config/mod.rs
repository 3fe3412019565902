//! Configuration module for expense-grid
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::GridPaths;
pub use settings::{AdvisorSettings, BackupRetention, Settings};

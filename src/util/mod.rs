//! Utility modules for linkpack
//!
//! - Structured logging setup and configuration
//! - File system helpers for listing, copying and removing trees

pub mod fs;
pub mod logging;

pub use logging::{init_default, init_from_env, init_logging, LoggingConfig};

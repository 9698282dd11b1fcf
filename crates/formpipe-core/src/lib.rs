//! # formpipe-core
//!
//! Core types, settings, logging, and error types for formpipe.
//! This crate has no knowledge of forms and provides the foundation the
//! pipeline crates build on.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`utils`] - Utility types (`MultiValueDict`)
//! - [`settings`] - Pipeline settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{FormpipeError, FormpipeResult, ValidationError};
pub use settings::{Settings, SETTINGS};

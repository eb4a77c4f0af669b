//! Core utilities for the tglogin tools
//!
//! This crate provides shared functionality used by the `tglogin` binary:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML file plus `TELEGRAM_*` environment variables
//! - **Validation**: Fluent validation of configuration values
//!
//! # Example
//!
//! ```rust,no_run
//! use tglogin_core::config::Config;
//!
//! let config = Config::load(None)?;
//! let verifier = config.login_verifier()?;
//! # Ok::<(), tglogin_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::validation::{ValidationResult, Validator};
}

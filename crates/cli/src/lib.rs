//! CLI utilities for the tglogin tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Key/value and JSON output

#![warn(missing_docs)]

pub mod output;

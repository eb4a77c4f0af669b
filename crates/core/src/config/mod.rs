//! Configuration loading and schema definitions
//!
//! Settings come from an optional TOML file; the bot identity can be
//! overridden from the environment and the bot token is read from the
//! environment only.

mod loader;
mod schema;

pub use loader::{Config, CALLBACK_URL_ENV, NAME_ENV, TOKEN_ENV};
pub use schema::*;

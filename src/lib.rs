#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::missing_errors_doc, // Internal API
    clippy::missing_panics_doc, // Internal API
    clippy::module_name_repetitions
)]

pub mod adapter;
pub mod app;
pub mod collector;
pub mod config;
pub mod domain;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod port;

// Re-export main types for easy access
pub use config::Config;
pub use error::RelayError;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

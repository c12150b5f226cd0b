//! Strategy screening client: boolean entry/exit condition trees over technical
//! indicators, canonicalized into backend requests and scanned page by page.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod strategies;

pub use error::{ConfigError, ScanError};

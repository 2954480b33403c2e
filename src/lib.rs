// src/lib.rs
//! S.M.A.R.T. acquisition through `smartctl`: per-device invocation, exit
//! status and message validation, fixture substitution, and a short-lived
//! per-device result cache.

pub mod collector;
pub mod config;
pub mod error;
pub mod telemetry;

pub use error::{CollectorError, Rejection};

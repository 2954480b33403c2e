// src/collector/mod.rs

pub mod cache;
pub mod fixture;
pub mod json;
pub mod smartctl;
pub mod status;
pub mod sys;

pub use cache::ReadingCache;
pub use fixture::{DEFAULT_FIXTURES_DIR, FixtureReader};
pub use json::{Message, Reading, normalize};
pub use smartctl::{Smartctl, SmartctlCommand};
pub use status::{STATUS_BITS, Severity, StatusBit, check_exit_status, check_messages, validate};
pub use sys::{build_report, get_hostname, get_timestamp};

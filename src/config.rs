// src/config.rs
//! Command line and environment configuration.

use crate::collector::{DEFAULT_FIXTURES_DIR, FixtureReader};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Collect S.M.A.R.T. data through smartctl and ship it as JSON over UDP
#[derive(Debug, Clone, Parser)]
#[command(name = "smartcollectd")]
#[command(version)]
pub struct Config {
    /// Path to the smartctl binary
    #[arg(long, env = "SMARTCTL_PATH", default_value = "smartctl")]
    pub smartctl_path: PathBuf,

    /// Seconds a device reading stays cached before smartctl is run again
    #[arg(long, env = "SMARTCTL_INTERVAL", default_value_t = 60)]
    pub interval: u64,

    /// Serve readings from fixture files instead of running smartctl
    #[arg(long, env = "SMARTCTL_FAKE_DATA")]
    pub fake_data: bool,

    /// Directory holding `<device>.json` fixtures
    #[arg(long, default_value = DEFAULT_FIXTURES_DIR)]
    pub fixtures_dir: PathBuf,

    /// Device to probe; repeat for several. Devices are discovered when omitted
    #[arg(long = "device")]
    pub devices: Vec<String>,

    /// UDP destination for reports
    #[arg(long, env = "METRICS_TARGET", default_value = "127.0.0.1:1555")]
    pub target: String,

    /// Seconds between reports
    #[arg(long, default_value_t = 10)]
    pub send_every: u64,
}

impl Config {
    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn send_period(&self) -> Duration {
        // tokio intervals reject a zero period.
        Duration::from_secs(self.send_every.max(1))
    }

    /// Reader for fixture mode, `None` when smartctl should be run.
    pub fn fixture_reader(&self) -> Option<FixtureReader> {
        self.fake_data
            .then(|| FixtureReader::new(self.fixtures_dir.clone()))
    }
}

// src/collector/fixture.rs
//! Canned smartctl readings loaded from disk instead of probing devices.

use crate::collector::json::{Reading, normalize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error};

/// Directory fixtures are read from unless configured otherwise.
pub const DEFAULT_FIXTURES_DIR: &str = "debug";

/// Reads `<dir>/<device name>.json` for a device.
#[derive(Debug, Clone)]
pub struct FixtureReader {
    dir: PathBuf,
}

impl FixtureReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Function to map a device to its fixture file, `/dev/sda` -> `<dir>/sda.json`.
    pub fn fixture_path(&self, device: &str) -> PathBuf {
        let name = device.rsplit('/').next().unwrap_or(device);
        self.dir.join(format!("{name}.json"))
    }

    /// Function to load the fixture for a device.
    ///
    /// Every call goes to disk. A missing or unreadable file is logged and
    /// yields the empty reading.
    pub fn read_fixture(&self, device: &str) -> Reading {
        let filename = self.fixture_path(device);
        debug!(filename = %filename.display(), "Read fake S.M.A.R.T. data from json");

        match fs::read(&filename) {
            Ok(bytes) => normalize(bytes),
            Err(err) => {
                error!(filename = %filename.display(), %err, "Fake S.M.A.R.T. data reading error");
                Reading::empty()
            }
        }
    }
}

impl Default for FixtureReader {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURES_DIR)
    }
}

// src/collector/smartctl.rs
//! Invocation of the external `smartctl` binary.

use crate::collector::json::{Reading, normalize};
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, warn};

/// Arguments for a single-device read.
pub const DEVICE_ARGS: [&str; 7] = [
    "--json",
    "--info",
    "--health",
    "--attributes",
    "--tolerance=verypermissive",
    "--nocheck=standby",
    "--format=brief",
];

/// Arguments for device discovery.
pub const SCAN_ARGS: [&str; 2] = ["--json", "--scan"];

/// smartctl exits with 2 from `--scan` when devices are asleep.
const SCAN_DEVICES_SLEEPING: i32 = 2;

/// Source of raw smartctl output.
pub trait Smartctl: Send + Sync {
    /// Raw stdout of a single-device read. Empty if the tool could not run.
    fn read_device(&self, device: &str) -> Vec<u8>;

    /// Device discovery, passed through without caching or validation.
    fn scan(&self) -> Reading;
}

impl<S: Smartctl + ?Sized> Smartctl for Arc<S> {
    fn read_device(&self, device: &str) -> Vec<u8> {
        (**self).read_device(device)
    }

    fn scan(&self) -> Reading {
        (**self).scan()
    }
}

/// `smartctl` run as a subprocess.
#[derive(Debug, Clone)]
pub struct SmartctlCommand {
    path: PathBuf,
}

impl SmartctlCommand {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Smartctl for SmartctlCommand {
    fn read_device(&self, device: &str) -> Vec<u8> {
        debug!(device, "Collecting S.M.A.R.T. counters");

        match Command::new(&self.path).args(DEVICE_ARGS).arg(device).output() {
            Ok(output) => {
                // The exit code is a bitmask judged by the status checks, not here.
                if !output.status.success() {
                    warn!(device, exit_code = ?output.status.code(), "S.M.A.R.T. output reading");
                }
                output.stdout
            }
            Err(err) => {
                warn!(device, %err, "S.M.A.R.T. output reading");
                Vec::new()
            }
        }
    }

    fn scan(&self) -> Reading {
        debug!("Scanning for devices");

        let output = match Command::new(&self.path).args(SCAN_ARGS).output() {
            Ok(output) => output,
            Err(err) => {
                warn!(%err, "S.M.A.R.T. output reading error");
                return Reading::empty();
            }
        };

        if let Some(code) = output.status.code().filter(|c| *c != 0) {
            debug!(exit_code = code, "Exit Status");
            if code != SCAN_DEVICES_SLEEPING {
                warn!(exit_code = code, "S.M.A.R.T. output reading error");
                return Reading::empty();
            }
        } else if !output.status.success() {
            // Killed by a signal.
            warn!(status = %output.status, "S.M.A.R.T. output reading error");
            return Reading::empty();
        }

        normalize(output.stdout)
    }
}

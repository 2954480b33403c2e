// src/collector/cache.rs
//! Per-device cache of the last accepted smartctl reading.

use crate::collector::fixture::FixtureReader;
use crate::collector::json::{Reading, normalize};
use crate::collector::smartctl::Smartctl;
use crate::collector::status::validate;
use crate::error::CollectorError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    reading: Reading,
    captured_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, interval: Duration) -> bool {
        match self.captured_at.checked_add(interval) {
            Some(expires) => now <= expires,
            None => true,
        }
    }
}

/// Serves the most recent accepted reading per device, re-probing once it
/// is older than the freshness interval.
///
/// Built once by the entry point and shared by handle. The map lock is only
/// held for lookups and inserts; probes run unlocked, so concurrent refreshes
/// of the same device both run and the last accepted one is kept.
pub struct ReadingCache<S> {
    source: S,
    fixtures: Option<FixtureReader>,
    interval: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<S: Smartctl> ReadingCache<S> {
    /// Fixture mode is on iff `fixtures` is `Some`.
    pub fn new(source: S, fixtures: Option<FixtureReader>, interval: Duration) -> Self {
        Self {
            source,
            fixtures,
            interval,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn uses_fixtures(&self) -> bool {
        self.fixtures.is_some()
    }

    /// Function to get the current reading for a device.
    ///
    /// Fixture mode bypasses the cache and validation entirely. Otherwise a
    /// fresh entry is returned as is, and an absent or stale one triggers a
    /// probe whose rejection leaves the stored entry untouched.
    pub fn get(&self, device: &str) -> Result<Reading, CollectorError> {
        if let Some(fixtures) = &self.fixtures {
            return Ok(fixtures.read_fixture(device));
        }

        if let Some(entry) = self.lock().get(device) {
            if entry.is_fresh(Instant::now(), self.interval) {
                debug!(device, "Serving cached S.M.A.R.T. reading");
                return Ok(entry.reading.clone());
            }
        }

        let reading = normalize(self.source.read_device(device));
        validate(device, &reading).map_err(|reason| CollectorError::Rejected {
            device: device.to_string(),
            reason,
        })?;

        self.lock().insert(
            device.to_string(),
            CacheEntry {
                reading: reading.clone(),
                captured_at: Instant::now(),
            },
        );
        Ok(reading)
    }

    /// Function to list devices reported by the tool.
    pub fn scan_devices(&self) -> Vec<String> {
        self.source.scan().device_names()
    }

    /// Stored reading for a device, regardless of freshness.
    pub fn cached(&self, device: &str) -> Option<Reading> {
        self.lock().get(device).map(|e| e.reading.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

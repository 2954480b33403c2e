use smartcollectd::collector::*;
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use smartcollectd::{CollectorError, Rejection};
    use std::collections::HashMap;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tracing::Level;

    /// Fake smartctl serving canned stdout per device and counting calls.
    #[derive(Default)]
    struct FakeSmartctl {
        outputs: Mutex<HashMap<String, Vec<u8>>>,
        calls: AtomicUsize,
    }

    impl FakeSmartctl {
        fn set(&self, device: &str, value: serde_json::Value) {
            self.outputs
                .lock()
                .unwrap()
                .insert(device.to_string(), serde_json::to_vec(&value).unwrap());
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Smartctl for FakeSmartctl {
        fn read_device(&self, device: &str) -> Vec<u8> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outputs
                .lock()
                .unwrap()
                .get(device)
                .cloned()
                .unwrap_or_default()
        }

        fn scan(&self) -> Reading {
            Reading::from(json!({"devices": [{"name": "/dev/sda"}, {"name": "/dev/sdb"}]}))
        }
    }

    fn status(code: i64) -> serde_json::Value {
        json!({"smartctl": {"exit_status": code}, "serial_number": format!("S{code}")})
    }

    /// Helper function to build a cache over a shared fake.
    fn create_cache(interval: Duration) -> (Arc<FakeSmartctl>, ReadingCache<Arc<FakeSmartctl>>) {
        let fake = Arc::new(FakeSmartctl::default());
        let cache = ReadingCache::new(Arc::clone(&fake), None, interval);
        (fake, cache)
    }

    /// Writer capturing formatted log lines.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn with_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, captured.text())
    }

    #[test]
    fn test_healthy_device_is_cached() {
        let (fake, cache) = create_cache(Duration::from_secs(60));
        fake.set("/dev/sda", status(0));

        let first = cache.get("/dev/sda").unwrap();
        assert_eq!(first.exit_status(), 0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.cached("/dev/sda"), Some(first.clone()));

        let second = cache.get("/dev/sda").unwrap();
        assert_eq!(fake.calls(), 1, "fresh entry must not re-run smartctl");
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_fatal_bit_rejected_and_not_cached() {
        let (fake, cache) = create_cache(Duration::from_secs(60));
        fake.set("/dev/sdb", status(2));

        let err = cache.get("/dev/sdb").unwrap_err();
        assert_eq!(err.device(), "/dev/sdb");
        assert!(err.to_string().contains("/dev/sdb"));
        assert!(matches!(
            err,
            CollectorError::Rejected {
                reason: Rejection::FatalExitStatus { status: 2, .. },
                ..
            }
        ));
        assert!(cache.cached("/dev/sdb").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_advisory_bit_accepted_and_logged() {
        let (fake, cache) = create_cache(Duration::from_secs(60));
        fake.set("/dev/sdc", status(4));

        let (result, logs) = with_logs(|| cache.get("/dev/sdc"));
        assert_eq!(result.unwrap().exit_status(), 4);
        assert!(cache.cached("/dev/sdc").is_some());
        assert!(logs.contains("WARN"));
        assert!(logs.contains("checksum error in a SMART data structure"));
    }

    #[test]
    fn test_fatal_bits_each_logged_at_error() {
        let (fake, cache) = create_cache(Duration::from_secs(60));
        fake.set("/dev/sdb", status(3));

        let (result, logs) = with_logs(|| cache.get("/dev/sdb"));
        assert!(result.is_err());

        let errors: Vec<&str> = logs.lines().filter(|l| l.contains("ERROR")).collect();
        assert_eq!(errors.len(), 2, "{logs}");
        assert!(errors.iter().any(|l| l.contains("Command line did not parse.")));
        assert!(errors.iter().any(|l| l.contains("Device open failed")));
        assert!(!logs.contains("WARN"));
    }

    #[test]
    fn test_advisory_bits_each_logged_at_warn() {
        let (fake, cache) = create_cache(Duration::from_secs(60));
        fake.set("/dev/sdc", status(0b1100_0100));

        let (result, logs) = with_logs(|| cache.get("/dev/sdc"));
        assert!(result.is_ok());

        let warnings: Vec<&str> = logs.lines().filter(|l| l.contains("WARN")).collect();
        assert_eq!(warnings.len(), 3, "{logs}");
        assert!(warnings.iter().any(|l| l.contains("checksum error in a SMART data structure")));
        assert!(warnings.iter().any(|l| l.contains("device error log contains records of errors")));
        assert!(warnings.iter().any(|l| l.contains("self-test log contains records of errors")));
        assert!(!logs.contains("ERROR"));
    }

    #[test]
    fn test_error_message_rejected_and_logged() {
        let (fake, cache) = create_cache(Duration::from_secs(60));
        fake.set(
            "/dev/sde",
            json!({"smartctl": {"exit_status": 0, "messages": [
                {"severity": "error", "string": "/dev/sde: Unable to detect device type"}
            ]}}),
        );

        let (result, logs) = with_logs(|| cache.get("/dev/sde"));
        assert!(matches!(
            result,
            Err(CollectorError::Rejected {
                reason: Rejection::ErrorMessage(_),
                ..
            })
        ));
        assert!(logs.contains("Unable to detect device type"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_output_yields_empty_reading() {
        // No stdout normalizes to {}, which carries neither a fatal bit nor an error message.
        let (fake, cache) = create_cache(Duration::from_secs(60));
        let reading = cache.get("/dev/sdx").unwrap();
        assert!(reading.is_empty());
        assert_eq!(fake.calls(), 1);
    }

    #[test]
    fn test_fixture_mode_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeSmartctl::default());
        let cache = ReadingCache::new(
            Arc::clone(&fake),
            Some(FixtureReader::new(dir.path())),
            Duration::from_secs(60),
        );
        assert!(cache.uses_fixtures());

        let (result, logs) = with_logs(|| cache.get("/dev/sdd"));
        assert!(result.unwrap().is_empty());
        assert!(logs.contains("ERROR"));
        assert_eq!(fake.calls(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fixture_mode_skips_validation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sdb.json"), r#"{"smartctl":{"exit_status":2}}"#).unwrap();
        let fake = Arc::new(FakeSmartctl::default());
        let cache = ReadingCache::new(
            Arc::clone(&fake),
            Some(FixtureReader::new(dir.path())),
            Duration::from_secs(60),
        );

        let reading = cache.get("/dev/sdb").unwrap();
        assert_eq!(reading.exit_status(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stale_entry_is_refreshed() {
        let (fake, cache) = create_cache(Duration::ZERO);
        fake.set("/dev/sda", status(0));
        cache.get("/dev/sda").unwrap();

        std::thread::sleep(Duration::from_millis(5));
        fake.set("/dev/sda", status(64));
        let refreshed = cache.get("/dev/sda").unwrap();

        assert_eq!(fake.calls(), 2);
        assert_eq!(refreshed.exit_status(), 64);
        assert_eq!(cache.cached("/dev/sda").unwrap().exit_status(), 64);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_rejection_keeps_fresh_entry() {
        let (fake, cache) = create_cache(Duration::from_secs(60));
        fake.set("/dev/sda", status(0));
        let original = cache.get("/dev/sda").unwrap();

        fake.set("/dev/sda", status(2));
        let again = cache.get("/dev/sda").unwrap();
        assert_eq!(again, original);
        assert_eq!(fake.calls(), 1);
    }

    #[test]
    fn test_rejected_refresh_keeps_stale_entry() {
        let (fake, cache) = create_cache(Duration::ZERO);
        fake.set("/dev/sda", status(0));
        let original = cache.get("/dev/sda").unwrap();

        std::thread::sleep(Duration::from_millis(5));
        fake.set("/dev/sda", status(1));
        assert!(cache.get("/dev/sda").is_err());
        assert_eq!(cache.cached("/dev/sda"), Some(original));
    }

    #[test]
    fn test_devices_cached_independently() {
        let (fake, cache) = create_cache(Duration::from_secs(60));
        let devices: Vec<String> = (0..8).map(|i| format!("/dev/sd{i}")).collect();
        for device in &devices {
            fake.set(device, status(0));
        }

        std::thread::scope(|s| {
            for device in &devices {
                let cache = &cache;
                s.spawn(move || cache.get(device).unwrap());
            }
        });

        assert_eq!(cache.len(), devices.len());
        assert_eq!(fake.calls(), devices.len());
    }

    #[test]
    fn test_scan_devices_passthrough() {
        let (fake, cache) = create_cache(Duration::from_secs(60));
        assert_eq!(cache.scan_devices(), vec!["/dev/sda", "/dev/sdb"]);
        assert_eq!(fake.calls(), 0);
        assert!(cache.is_empty());
    }
}

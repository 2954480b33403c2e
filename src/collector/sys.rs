// src/collector/sys.rs
//! Host identity and assembly of the JSON report sent to the sink.

use crate::collector::json::Reading;
use crate::error::CollectorError;
use serde_json::{Value, json};
use sysinfo::System;

/// Function to generate a timestamp in epoch time.
pub fn get_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Function to extract hostname of the system.
pub fn get_hostname() -> String {
    System::host_name().unwrap_or_else(|| "unknown".to_string())
}

/// Function to render one device result.
pub fn device_json(device: &str, result: &Result<Reading, CollectorError>) -> Value {
    match result {
        Ok(reading) => json!({ "device": device, "reading": reading }),
        Err(err) => json!({ "device": device, "error": err.to_string() }),
    }
}

/// Function to wrap device results in a single report object.
pub fn build_report(results: &[(String, Result<Reading, CollectorError>)]) -> Value {
    let smart: Vec<Value> = results
        .iter()
        .map(|(device, result)| device_json(device, result))
        .collect();

    json!({
        "timestamp": get_timestamp(),
        "hostname": get_hostname(),
        "smart": smart,
    })
}

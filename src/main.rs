// src/main.rs
use clap::Parser;
use smartcollectd::CollectorError;
use smartcollectd::collector::{Reading, ReadingCache, SmartctlCommand, build_report};
use smartcollectd::config::Config;
use smartcollectd::telemetry;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

type Cache = ReadingCache<SmartctlCommand>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();
    let config = Config::parse();

    let cache = Arc::new(ReadingCache::new(
        SmartctlCommand::new(&config.smartctl_path),
        config.fixture_reader(),
        config.freshness(),
    ));

    info!(destination = %config.target, fake_data = config.fake_data, "Sending S.M.A.R.T. reports over UDP");

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    let mut ticker = tokio::time::interval(config.send_period());

    loop {
        ticker.tick().await;

        let devices = resolve_devices(&config, &cache).await;
        if devices.is_empty() {
            warn!("No devices to probe");
            continue;
        }

        let results = collect(&cache, devices).await;
        let bytes = match serde_json::to_vec(&build_report(&results)) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(%err, "Failed to encode report");
                continue;
            }
        };

        match socket.send_to(&bytes, &config.target).await {
            Ok(sent) => info!(destination = %config.target, bytes = sent, "Sent report"),
            Err(err) => error!(destination = %config.target, %err, "Failed to send UDP packet"),
        }
    }
}

/// Function to pick configured devices, or discover them.
async fn resolve_devices(config: &Config, cache: &Arc<Cache>) -> Vec<String> {
    if !config.devices.is_empty() {
        return config.devices.clone();
    }

    let cache = Arc::clone(cache);
    match tokio::task::spawn_blocking(move || cache.scan_devices()).await {
        Ok(devices) => devices,
        Err(err) => {
            error!(%err, "Device scan task failed");
            Vec::new()
        }
    }
}

/// Function to probe every device concurrently, keeping input order.
async fn collect(
    cache: &Arc<Cache>,
    devices: Vec<String>,
) -> Vec<(String, Result<Reading, CollectorError>)> {
    let mut tasks = JoinSet::new();
    for (idx, device) in devices.into_iter().enumerate() {
        let cache = Arc::clone(cache);
        tasks.spawn_blocking(move || {
            let result = cache.get(&device);
            (idx, device, result)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(done) => results.push(done),
            Err(err) => error!(%err, "Device probe task failed"),
        }
    }

    results.sort_by_key(|(idx, _, _)| *idx);
    results
        .into_iter()
        .map(|(_, device, result)| (device, result))
        .collect()
}

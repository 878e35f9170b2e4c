//! IPAL Monitoring - Terminal Monitor
//!
//! A small terminal client that continuously:
//! 1. Loads client configuration from the environment (.env / IPAL_* vars)
//! 2. Restores the previously selected installation, or picks the first one
//! 3. Polls the alert endpoints on the configured interval
//! 4. Prints grouped alert summaries as the cache updates
//!
//! Usage:
//!   cargo run --release              # Monitor the stored/first installation
//!   cargo run --release -- ipal2     # Monitor a specific installation
//!
//! Environment:
//!   IPAL_API_BASE_URL - Base URL of the IPAL REST API (required)
//!   IPAL_API_TOKEN    - Bearer token for authenticated endpoints

use std::env;
use std::thread;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use ipalmon_client::alert::group_alerts;
use ipalmon_client::cache::CacheKey;
use ipalmon_client::config;
use ipalmon_client::model::{AlertRecord, Ipal};
use ipalmon_client::storage::SelectionStore;
use ipalmon_client::sync::SyncService;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("💧 IPAL Monitoring - Terminal Monitor");
    println!("=====================================\n");

    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}\n", e);
            eprintln!("Set IPAL_API_BASE_URL (and IPAL_API_TOKEN) in the environment or .env");
            std::process::exit(1);
        }
    };

    let service = match SyncService::new(&config) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("❌ Failed to build API client: {}", e);
            std::process::exit(1);
        }
    };

    let store = match SelectionStore::open(&config.storage_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Failed to open storage directory: {}", e);
            std::process::exit(1);
        }
    };

    // Installation to monitor: CLI argument, then stored selection, then the
    // first active installation from the registry.
    let requested = env::args().nth(1);
    let stored = store.load_selected_ipal().unwrap_or(None);
    let ipal_id = match requested.or(stored) {
        Some(id) => id,
        None => match first_installation(&service) {
            Some(ipal) => {
                println!("📋 No installation selected, using {} ({})", ipal.name, ipal.id);
                ipal.id
            }
            None => {
                eprintln!("❌ Could not load the installation registry");
                std::process::exit(1);
            }
        },
    };
    if let Err(e) = store.save_selected_ipal(&ipal_id) {
        eprintln!("   ⚠ Could not persist selection: {}", e);
    }

    println!("🔄 Monitoring installation: {}", ipal_id);
    println!("   Poll interval: {} seconds", config.alert_poll_interval_secs);
    println!("   Press Ctrl+C to stop\n");

    // Print a grouped summary on every settled alert cache update.
    let key = CacheKey::Alerts { ipal_id: ipal_id.clone() };
    service.cache().subscribe(&key, |entry| {
        if entry.in_flight {
            return;
        }
        if let Some(e) = &entry.error {
            eprintln!("   ✗ Alert fetch failed: {}", e);
            return;
        }
        if let Some(alerts) = entry.decode::<Vec<AlertRecord>>() {
            print_groups(&alerts);
        }
    });

    let poller = service.alert_poller(&ipal_id);
    poller.start();

    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

/// Blocks until the installation registry fetch settles, then returns the
/// first active installation (or the first one at all).
fn first_installation(service: &SyncService) -> Option<Ipal> {
    service.ipals();
    for _ in 0..100 {
        if let Some(entry) = service.cache().get(&CacheKey::IpalList) {
            if !entry.in_flight && (entry.data.is_some() || entry.error.is_some()) {
                let ipals = entry.decode::<Vec<Ipal>>()?;
                return ipals
                    .iter()
                    .find(|i| i.active)
                    .or_else(|| ipals.first())
                    .cloned();
            }
        }
        thread::sleep(Duration::from_millis(100));
    }
    None
}

fn print_groups(alerts: &[AlertRecord]) {
    let groups = group_alerts(alerts.to_vec());
    if groups.is_empty() {
        println!("   ✓ No alerts");
        return;
    }
    println!("   {} alert group(s):", groups.len());
    for group in &groups {
        let severity = group
            .highest_severity()
            .map(|s| s.as_str().to_uppercase())
            .unwrap_or_default();
        let state = if group.has_active_alerts() {
            "active"
        } else if group.all_resolved() {
            "resolved"
        } else {
            "acknowledged"
        };
        println!(
            "   [{}] reading {} - {} alert(s), {}",
            severity,
            group.reading_id,
            group.alerts.len(),
            state
        );
        for alert in &group.alerts {
            println!(
                "      {} {}: {} (value {}, threshold {})",
                alert.timestamp.format("%H:%M:%S"),
                alert.parameter,
                alert.message,
                alert.value,
                alert.threshold
            );
        }
    }
    println!();
}

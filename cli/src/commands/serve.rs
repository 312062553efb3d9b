// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Control-plane daemon
//!
//! Serves the dashboard HTTP surface, exposes Prometheus metrics, and runs
//! the stale-process reaper on a periodic trigger.

use anyhow::{Context, Result};
use colored::Colorize;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use aegis_warden_core::presentation::api;
use aegis_warden_core::ControlPlane;

pub async fn run(
    control: Arc<ControlPlane>,
    host: &str,
    port: u16,
    metrics_port: u16,
    reap_interval_secs: u64,
) -> Result<()> {
    let metrics_addr: SocketAddr = format!("{host}:{metrics_port}")
        .parse()
        .context("Invalid metrics listen address")?;
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    if reap_interval_secs > 0 {
        let reaper_control = control.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(reap_interval_secs));
            // First tick fires immediately; skip it so startup stays quiet.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let report = reaper_control.reap_stale_agents(None).await;
                if report.killed_count > 0 {
                    warn!(killed = report.killed_count, "Periodic reaper terminated stale agents");
                }
            }
        });
    }

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, metrics_port, reap_interval_secs, "Warden control plane listening");
    println!("{} http://{addr}", "Warden control plane listening on".bold());

    axum::serve(listener, api::app(control))
        .await
        .context("HTTP server terminated")?;
    Ok(())
}

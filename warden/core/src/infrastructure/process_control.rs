// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! OS Process Controller (sysinfo)
//!
//! Live process-table implementation of [`ProcessController`]. Every call
//! takes a fresh snapshot - stale-process records are transient and never
//! cached. Enumeration runs on the blocking pool; any failure there reads as
//! an empty table per the reaper's failure policy.

use async_trait::async_trait;
use sysinfo::{Pid, ProcessRefreshKind, RefreshKind, Signal, System};
use tracing::warn;

use crate::domain::process::{ProcessController, ProcessRecord};

pub struct SysinfoProcessController;

impl SysinfoProcessController {
    pub fn new() -> Self {
        Self
    }

    fn fresh_system() -> System {
        System::new_with_specifics(RefreshKind::new().with_processes(ProcessRefreshKind::new()))
    }
}

impl Default for SysinfoProcessController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessController for SysinfoProcessController {
    async fn processes(&self) -> Vec<ProcessRecord> {
        let scan = tokio::task::spawn_blocking(|| {
            let sys = Self::fresh_system();
            sys.processes()
                .iter()
                .map(|(pid, process)| ProcessRecord {
                    pid: pid.as_u32(),
                    elapsed_seconds: process.run_time(),
                    command_line: process.cmd().join(" "),
                })
                .collect::<Vec<_>>()
        })
        .await;

        match scan {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Process enumeration failed; treating table as empty");
                Vec::new()
            }
        }
    }

    async fn terminate(&self, pid: u32) -> bool {
        tokio::task::spawn_blocking(move || {
            let sys = Self::fresh_system();
            match sys.process(Pid::from_u32(pid)) {
                // Signal delivery failure is reported, not raised.
                Some(process) => process.kill_with(Signal::Term).unwrap_or(false),
                // Already gone: killing a dead process is not an error.
                None => true,
            }
        })
        .await
        .unwrap_or(false)
    }

    async fn kill(&self, pid: u32) -> bool {
        tokio::task::spawn_blocking(move || {
            let sys = Self::fresh_system();
            match sys.process(Pid::from_u32(pid)) {
                Some(process) => process.kill(),
                None => true,
            }
        })
        .await
        .unwrap_or(false)
    }

    async fn is_alive(&self, pid: u32) -> bool {
        tokio::task::spawn_blocking(move || {
            let mut sys = Self::fresh_system();
            sys.refresh_process(Pid::from_u32(pid))
        })
        .await
        .unwrap_or(false)
    }
}

// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Stale-Process Reaper - Stale Agent Context
//!
//! Scans the process table for agent invocations that overran their runtime
//! budget and terminates them: graceful signal, short grace interval,
//! liveness re-check, forceful signal. Each kill attempt is independent and
//! idempotent; an already-dead target is success. Nothing here ever crashes
//! the caller - the reaper typically runs from a periodic trigger.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::process::{
    is_agent_command, ProcessController, ProcessRecord, ReapOutcome, ReapReport,
};

/// Grace interval between the graceful signal and the liveness re-check.
const KILL_GRACE: Duration = Duration::from_secs(1);

pub struct StaleReaper {
    processes: Arc<dyn ProcessController>,
}

impl StaleReaper {
    pub fn new(processes: Arc<dyn ProcessController>) -> Self {
        Self { processes }
    }

    /// Agent processes whose elapsed runtime strictly exceeds the threshold.
    /// A process at exactly the threshold is not stale.
    pub async fn find_stale(&self, threshold_seconds: u64) -> Vec<ProcessRecord> {
        self.processes
            .processes()
            .await
            .into_iter()
            .filter(|p| is_agent_command(&p.command_line) && p.elapsed_seconds > threshold_seconds)
            .collect()
    }

    /// Terminate every stale agent process, reporting per-process outcomes.
    pub async fn reap(&self, threshold_seconds: u64) -> ReapReport {
        let stale = self.find_stale(threshold_seconds).await;
        if stale.is_empty() {
            return ReapReport::default();
        }
        info!(count = stale.len(), threshold_seconds, "Reaping stale agent processes");

        let mut report = ReapReport::default();
        for record in stale {
            let outcome = self.kill_one(record).await;
            if outcome.killed {
                report.killed_count += 1;
            } else {
                warn!(pid = outcome.pid, "Stale agent survived both termination signals");
            }
            report.details.push(outcome);
        }
        metrics::counter!("warden_agents_reaped_total").increment(report.killed_count as u64);
        report
    }

    /// Best-effort kill of every running agent process regardless of runtime,
    /// used by the pause controller's `kill_running` option. Returns the
    /// number of processes no longer alive afterwards.
    pub async fn kill_all_agents(&self) -> usize {
        let agents: Vec<ProcessRecord> = self
            .processes
            .processes()
            .await
            .into_iter()
            .filter(|p| is_agent_command(&p.command_line))
            .collect();

        let mut killed = 0;
        for record in agents {
            if self.kill_one(record).await.killed {
                killed += 1;
            }
        }
        killed
    }

    async fn kill_one(&self, record: ProcessRecord) -> ReapOutcome {
        self.processes.terminate(record.pid).await;
        tokio::time::sleep(KILL_GRACE).await;

        let mut forced = false;
        if self.processes.is_alive(record.pid).await {
            forced = true;
            self.processes.kill(record.pid).await;
        }
        let killed = !self.processes.is_alive(record.pid).await;

        ReapOutcome {
            pid: record.pid,
            command_line: record.command_line,
            elapsed_seconds: record.elapsed_seconds,
            forced,
            killed,
        }
    }
}

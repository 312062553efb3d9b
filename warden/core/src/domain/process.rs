// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process Control - Stale Agent Context
//!
//! Narrow interface over the operating system's process table so the reaper's
//! logic is testable without touching real processes (tests inject a fake
//! controller). Records are produced fresh on every pass from a live OS
//! query and never cached.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default runtime budget before an agent is presumed hung: two hours.
pub const DEFAULT_STALE_THRESHOLD_SECS: u64 = 2 * 60 * 60;

/// Command-line signatures identifying agent invocations, one per execution
/// engine. Substring match against the space-joined command line.
pub const AGENT_PROCESS_SIGNATURES: &[&str] = &[
    "claude -p",
    "codex exec",
    "opencode run",
    "gemini -p",
];

/// Does this command line belong to one of our agent processes?
pub fn is_agent_command(command_line: &str) -> bool {
    AGENT_PROCESS_SIGNATURES.iter().any(|sig| command_line.contains(sig))
}

/// Transient view of one OS process. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub elapsed_seconds: u64,
    pub command_line: String,
}

/// Per-process outcome of one reap pass, so callers can report partial
/// success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReapOutcome {
    pub pid: u32,
    pub command_line: String,
    pub elapsed_seconds: u64,
    /// The graceful signal was not enough; the forceful one was sent.
    pub forced: bool,
    pub killed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReapReport {
    pub killed_count: usize,
    pub details: Vec<ReapOutcome>,
}

/// OS process inspection and signaling seam.
///
/// All operations are best-effort: enumeration failure reads as an empty
/// table, and signaling an already-dead process is success, not an error.
#[async_trait]
pub trait ProcessController: Send + Sync {
    /// Snapshot of the live process table.
    async fn processes(&self) -> Vec<ProcessRecord>;

    /// Send the graceful termination signal. Returns false only when the
    /// signal could not be delivered to a live process.
    async fn terminate(&self, pid: u32) -> bool;

    /// Send the forceful termination signal.
    async fn kill(&self, pid: u32) -> bool;

    /// Re-check liveness after the grace interval.
    async fn is_alive(&self, pid: u32) -> bool;
}

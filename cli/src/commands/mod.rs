// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Provides mod functionality for the system.
//!
//! # Architecture
//!
//! - **Layer:** CLI Commands
//! - **Purpose:** Implements mod

pub mod genome;
pub mod pipelines;
pub mod policy;
pub mod reap;
pub mod serve;
pub mod swarm;

pub use genome::GenomeCommand;
pub use policy::PolicyCommand;
pub use swarm::SwarmCommand;

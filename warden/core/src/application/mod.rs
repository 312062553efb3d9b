// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Provides mod functionality for the system.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Implements mod

pub mod policy;
pub mod demand;
pub mod ranking;
pub mod pause;
pub mod reaper;
pub mod genome;
pub mod control_plane;

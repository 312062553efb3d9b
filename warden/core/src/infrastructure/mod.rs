// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Provides mod functionality for the system.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Implements mod

pub mod document_store;
pub mod taxonomy_loader;
pub mod process_control;
pub mod persona_store;
pub mod activity;
pub mod snapshots;

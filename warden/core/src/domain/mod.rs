// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Provides mod functionality for the system.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements mod

pub mod policy;
pub mod taxonomy;
pub mod demand;
pub mod ranking;
pub mod pause;
pub mod genome;
pub mod process;
pub mod collaborators;

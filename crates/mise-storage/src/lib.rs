// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Mise generation service.
//!
//! Stores completed recipes and meal plans in WAL-mode SQLite with embedded
//! migrations. All access is serialized through `tokio-rusqlite`'s
//! background thread.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;

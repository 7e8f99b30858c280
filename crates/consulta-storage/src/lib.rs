// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for the Consulta appointment service.
//!
//! Provides a WAL-mode SQLite store with embedded migrations and a
//! single-writer concurrency model via `tokio-rusqlite`, plus an in-memory
//! store with identical semantics for tests and ephemeral runs. Both
//! implement the conditional status update that guards transitions against
//! lost updates.

pub mod adapter;
pub mod database;
pub mod memory;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
pub use memory::MemoryStore;

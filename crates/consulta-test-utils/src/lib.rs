// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Consulta integration tests.
//!
//! Provides mock collaborators and a harness that wires a complete
//! [`LifecycleService`](consulta_lifecycle::LifecycleService) over either a
//! temp SQLite database or the in-memory store.
//!
//! # Components
//!
//! - [`MockNotifier`] - records emitted events, optionally failing every call
//! - [`ManualClock`] - a clock that only moves when told to
//! - [`fixtures`] - canned actors, consultants, and requests
//! - [`TestHarness`] - the assembled service

pub mod clock;
pub mod fixtures;
pub mod harness;
pub mod mock_notifier;

pub use clock::ManualClock;
pub use harness::{StoreKind, TestHarness};
pub use mock_notifier::MockNotifier;

// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time source injected into the lifecycle service.

use chrono::{DateTime, Utc};

use crate::types::truncate_timestamp;

/// Source of "now" for audit timestamps.
pub trait Clock: Send + Sync {
    /// Current time at millisecond precision.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_timestamp(Utc::now())
    }
}

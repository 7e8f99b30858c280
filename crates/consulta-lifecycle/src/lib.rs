// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment lifecycle management.
//!
//! [`transition::plan`] is the pure status state machine. [`LifecycleService`]
//! wraps it with a store read, a conditional write, meeting provisioning, and
//! best-effort notification. [`matcher`], [`query`], and [`stats`] cover the
//! read side used by dashboards.

pub mod matcher;
pub mod meeting;
pub mod query;
pub mod service;
pub mod stats;
pub mod transition;

pub use matcher::rank_candidates;
pub use meeting::UrlTemplateProvisioner;
pub use query::{ListQuery, ListScope, can_view};
pub use service::LifecycleService;
pub use stats::AppointmentStats;
pub use transition::{Action, ActionKind, plan};

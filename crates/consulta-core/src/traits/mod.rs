// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the collaborators around the lifecycle core.
//!
//! Persistent backends extend the [`Adapter`] base trait. All async traits use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod clock;
pub mod directory;
pub mod meeting;
pub mod notifier;
pub mod store;

pub use adapter::Adapter;
pub use clock::{Clock, SystemClock};
pub use directory::ConsultantDirectory;
pub use meeting::MeetingProvisioner;
pub use notifier::NotificationSink;
pub use store::AppointmentStore;

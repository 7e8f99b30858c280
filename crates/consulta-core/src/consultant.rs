// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consultant profile as seen by the matcher.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A consultant who can be assigned to appointments.
///
/// Only `is_available` carries meaning for assignment; the aggregate stats
/// are used for ranking and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultantProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub is_available: bool,
    #[serde(default)]
    pub total_sessions: u32,
    /// Average rating, 0.0 to 5.0.
    #[serde(default)]
    pub rating: f64,
    /// Share of sessions completed successfully, 0.0 to 100.0.
    #[serde(default)]
    pub success_rate: f64,
    /// Median time to answer an assignment, in minutes.
    #[serde(default)]
    pub response_time_minutes: u32,
}

impl ConsultantProfile {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            specialties: Vec::new(),
            is_available: true,
            total_sessions: 0,
            rating: 0.0,
            success_rate: 0.0,
            response_time_minutes: 0,
        }
    }

    /// Case-insensitive match of `needle` against name, email, and specialties.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self
                .specialties
                .iter()
                .any(|s| s.to_lowercase().contains(&needle))
    }
}

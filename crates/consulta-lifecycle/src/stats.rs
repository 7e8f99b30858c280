// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard summary figures over a list of appointments.

use serde::Serialize;

use consulta_core::{Appointment, AppointmentStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppointmentStats {
    pub total: usize,
    pub pending: usize,
    pub assigned: usize,
    pub confirmed: usize,
    pub rejected: usize,
    pub completed: usize,
    pub canceled: usize,
    /// Appointments not yet in a terminal state.
    pub open: usize,
    /// Sum of `duration` over completed appointments.
    pub completed_minutes: u64,
    /// `completed / (completed + rejected + canceled) * 100`, or 0 when
    /// nothing has closed yet.
    pub completion_rate: f64,
}

impl AppointmentStats {
    pub fn summarize(appointments: &[Appointment]) -> Self {
        let mut stats = Self {
            total: appointments.len(),
            ..Default::default()
        };
        for appt in appointments {
            match appt.status {
                AppointmentStatus::Pending => stats.pending += 1,
                AppointmentStatus::Assigned => stats.assigned += 1,
                AppointmentStatus::Confirmed => stats.confirmed += 1,
                AppointmentStatus::Rejected => stats.rejected += 1,
                AppointmentStatus::Completed => {
                    stats.completed += 1;
                    stats.completed_minutes += u64::from(appt.duration);
                }
                AppointmentStatus::Canceled => stats.canceled += 1,
            }
            if !appt.status.is_terminal() {
                stats.open += 1;
            }
        }
        let closed = stats.completed + stats.rejected + stats.canceled;
        if closed > 0 {
            stats.completion_rate = stats.completed as f64 / closed as f64 * 100.0;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use consulta_core::{AppointmentId, Urgency, UserId};

    fn appt(id: &str, status: AppointmentStatus, duration: u32) -> Appointment {
        let now = Utc::now();
        Appointment {
            id: AppointmentId::parse(id).unwrap(),
            title: "Suivi".into(),
            description: String::new(),
            scheduled_at: now,
            duration,
            status,
            urgency: Urgency::Low,
            requester: UserId::parse("emp-1").unwrap(),
            consultant: status
                .requires_consultant()
                .then(|| UserId::parse("consultant-7").unwrap()),
            company: None,
            meeting_url: None,
            notes: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_list_has_zero_rate() {
        let stats = AppointmentStats::summarize(&[]);
        assert_eq!(stats, AppointmentStats::default());
    }

    #[test]
    fn counts_and_rate() {
        let stats = AppointmentStats::summarize(&[
            appt("A1", AppointmentStatus::Completed, 45),
            appt("A2", AppointmentStatus::Completed, 30),
            appt("A3", AppointmentStatus::Rejected, 60),
            appt("A4", AppointmentStatus::Canceled, 60),
            appt("A5", AppointmentStatus::Pending, 60),
            appt("A6", AppointmentStatus::Confirmed, 60),
        ]);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.open, 2);
        assert_eq!(stats.completed_minutes, 75);
        assert_eq!(stats.completion_rate, 50.0);
    }
}

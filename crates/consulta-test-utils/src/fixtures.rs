// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned actors, consultants, and requests.

use chrono::{DateTime, TimeZone, Utc};

use consulta_core::{Actor, CompanyId, ConsultantProfile, NewAppointment, Role, UserId};

pub const COMPANY: &str = "acme";

fn user(id: &str) -> UserId {
    UserId::parse(id).unwrap_or_else(|e| panic!("fixture id `{id}` is invalid: {e}"))
}

fn company() -> CompanyId {
    CompanyId::parse(COMPANY).unwrap_or_else(|e| panic!("fixture company is invalid: {e}"))
}

pub fn admin() -> Actor {
    Actor::new(user("admin-1"), Role::AdminEntreprise).with_company(company())
}

pub fn employee() -> Actor {
    Actor::new(user("emp-1"), Role::Employe).with_company(company())
}

pub fn other_employee() -> Actor {
    Actor::new(user("emp-2"), Role::Employe).with_company(company())
}

pub fn consultant(id: &str) -> Actor {
    Actor::new(user(id), Role::Consultant)
}

/// Directory entries: consultant-7 available, consultant-3 available,
/// consultant-9 unavailable.
pub fn consultants() -> Vec<ConsultantProfile> {
    let mut seven = ConsultantProfile::new(user("consultant-7"), "Alice Martin", "alice@example.com");
    seven.specialties = vec!["paie".into(), "droit social".into()];
    seven.success_rate = 92.0;
    seven.rating = 4.7;
    seven.total_sessions = 120;

    let mut three = ConsultantProfile::new(user("consultant-3"), "Bruno Petit", "bruno@example.com");
    three.specialties = vec!["fiscalité".into()];
    three.success_rate = 85.0;
    three.rating = 4.9;
    three.total_sessions = 64;

    let mut nine = ConsultantProfile::new(user("consultant-9"), "Chloé Durand", "chloe@example.com");
    nine.is_available = false;
    nine.success_rate = 99.0;
    nine.rating = 5.0;

    vec![seven, three, nine]
}

pub fn scheduled_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 14, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn request(title: &str, duration: u32) -> NewAppointment {
    NewAppointment {
        title: title.into(),
        description: String::new(),
        scheduled_at: scheduled_at(),
        duration,
        urgency: None,
    }
}

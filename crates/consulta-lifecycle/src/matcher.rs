// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate ranking for consultant assignment.
//!
//! Ranking is a display order only. Unavailable consultants are listed last
//! but stay assignable.

use std::cmp::Ordering;

use consulta_core::ConsultantProfile;

fn compare(a: &ConsultantProfile, b: &ConsultantProfile) -> Ordering {
    b.is_available
        .cmp(&a.is_available)
        .then_with(|| b.success_rate.total_cmp(&a.success_rate))
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Filter `consultants` by an optional free-text query and sort them:
/// available first, then success rate, then rating, then name.
pub fn rank_candidates(
    consultants: Vec<ConsultantProfile>,
    query: Option<&str>,
) -> Vec<ConsultantProfile> {
    let mut ranked: Vec<_> = match query {
        Some(q) => consultants.into_iter().filter(|c| c.matches_text(q)).collect(),
        None => consultants,
    };
    ranked.sort_by(compare);
    ranked
}

// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped list queries used by the dashboards.
//!
//! A scope is an authorization-shaped predicate: it decides which foreign key
//! the listing is restricted to, based on who is asking.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use consulta_core::{
    Actor, Appointment, AppointmentFilter, AppointmentStatus, ConsultaError, Role,
};

/// Which appointments a listing covers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ListScope {
    /// Appointments the actor requested.
    #[default]
    #[strum(serialize = "self")]
    #[serde(rename = "self")]
    Own,
    /// Appointments of the actor's company. Admins only.
    #[strum(serialize = "company")]
    #[serde(rename = "company")]
    Company,
    /// Appointments assigned to the actor. Consultants only.
    #[strum(serialize = "assigned-to-me")]
    #[serde(rename = "assigned-to-me")]
    AssignedToMe,
}

impl ListScope {
    /// Translate the scope into a store filter for `actor`.
    pub fn filter_for(self, actor: &Actor) -> Result<AppointmentFilter, ConsultaError> {
        match self {
            Self::Own => Ok(AppointmentFilter {
                requester: Some(actor.id.clone()),
                ..Default::default()
            }),
            Self::Company => {
                if !actor.role.is_admin() {
                    return Err(ConsultaError::Forbidden {
                        action: "list company",
                        role: actor.role,
                    });
                }
                let company = actor.company.clone().ok_or_else(|| {
                    ConsultaError::Validation(format!(
                        "actor {} has no company to list appointments for",
                        actor.id
                    ))
                })?;
                Ok(AppointmentFilter {
                    company: Some(company),
                    ..Default::default()
                })
            }
            Self::AssignedToMe => {
                if actor.role != Role::Consultant {
                    return Err(ConsultaError::Forbidden {
                        action: "list assigned",
                        role: actor.role,
                    });
                }
                Ok(AppointmentFilter {
                    consultant: Some(actor.id.clone()),
                    ..Default::default()
                })
            }
        }
    }
}

/// Parameters of a list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub scope: ListScope,
    pub status: Option<AppointmentStatus>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new(scope: ListScope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn filter_for(&self, actor: &Actor) -> Result<AppointmentFilter, ConsultaError> {
        let mut filter = self.scope.filter_for(actor)?;
        filter.status = self.status;
        Ok(filter)
    }
}

/// Whether `actor` may read `appointment` by id.
///
/// The requester, the assigned consultant, and admins of the appointment's
/// company can read it. Nobody else can.
pub fn can_view(actor: &Actor, appointment: &Appointment) -> bool {
    if appointment.requester == actor.id || appointment.consultant.as_ref() == Some(&actor.id) {
        return true;
    }
    actor.role.is_admin() && actor.company.is_some() && actor.company == appointment.company
}

/// Case-insensitive substring match over title, description, and notes.
/// A blank needle matches everything.
pub fn matches_search(appointment: &Appointment, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    appointment.title.to_lowercase().contains(&needle)
        || appointment.description.to_lowercase().contains(&needle)
        || appointment
            .notes
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&needle))
}

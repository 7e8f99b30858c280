// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meeting link provisioning from a configured base URL.

use async_trait::async_trait;

use consulta_config::model::MeetingConfig;
use consulta_core::{Appointment, ConsultaError, MeetingProvisioner};

/// Builds `{base_url}/{appointment_id}` links. Without a base URL no link is
/// produced and confirmations carry no `meeting_url`.
#[derive(Debug, Clone, Default)]
pub struct UrlTemplateProvisioner {
    base_url: Option<String>,
}

impl UrlTemplateProvisioner {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn from_config(config: &MeetingConfig) -> Self {
        Self::new(config.base_url.clone())
    }
}

#[async_trait]
impl MeetingProvisioner for UrlTemplateProvisioner {
    async fn provision(&self, appointment: &Appointment) -> Result<Option<String>, ConsultaError> {
        Ok(self
            .base_url
            .as_ref()
            .map(|base| format!("{base}/{}", appointment.id)))
    }
}

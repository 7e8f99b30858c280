// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consultant directory trait.

use async_trait::async_trait;

use crate::consultant::ConsultantProfile;
use crate::error::ConsultaError;
use crate::types::UserId;

/// Source of consultant profiles for matching and assignment.
#[async_trait]
pub trait ConsultantDirectory: Send + Sync {
    async fn get_consultant(&self, id: &UserId) -> Result<Option<ConsultantProfile>, ConsultaError>;

    async fn list_consultants(&self) -> Result<Vec<ConsultantProfile>, ConsultaError>;
}

// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/consulta/consulta.toml`, then
//! `~/.config/consulta/consulta.toml`, then `./consulta.toml`, with
//! `CONSULTA_*` environment variables applied last.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ConsultaConfig;

/// Config sections that environment variables can target.
const ENV_SECTIONS: &[&str] = &["service", "storage", "gateway", "lifecycle", "meeting"];

/// Config files in merge order (later overrides earlier).
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/consulta/consulta.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("consulta").join("consulta.toml"));
    }
    paths.push(PathBuf::from("consulta.toml"));
    paths
}

/// Build the layered Figment: defaults, config files, then env vars.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(ConsultaConfig::default()));
    for path in config_file_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<ConsultaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ConsultaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConsultaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ConsultaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConsultaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Map `CONSULTA_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `CONSULTA_GATEWAY_BEARER_TOKEN` maps to `gateway.bearer_token`.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("CONSULTA_").map(|key| map_env_key(key.as_str()).into())
}

// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tola.toml` > `~/.config/tola/tola.toml` >
//! `/etc/tola/tola.toml` with environment variable overrides via the
//! `TOLA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TolaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tola/tola.toml` (system-wide)
/// 3. `~/.config/tola/tola.toml` (user XDG config)
/// 4. `./tola.toml` (local directory)
/// 5. `TOLA_*` environment variables
pub fn load_config() -> Result<TolaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TolaConfig::default()))
        .merge(Toml::file("/etc/tola/tola.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tola/tola.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tola.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TolaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TolaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TolaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TolaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TOLA_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("TOLA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TOLA_SMTP_FROM_ADDRESS -> "smtp_from_address"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("smtp_", "smtp.", 1);
        mapped.into()
    })
}

//! Portal configuration
//!
//! Everything that varies per deployment comes from one TOML file: bind
//! address, store location, the two fixed role credential pairs, and the
//! message-generation settings. Role pairs live here, not in code.

use anyhow::Context;
use cohort_core::RoleCredentials;
use cohort_messages::GeneratorConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Top-level portal configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Address to serve on
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Path of the JSON study store file
    pub store_path: PathBuf,
    /// Fixed role credential pairs
    pub roles: RoleCredentials,
    /// Confirmation-message settings
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Message-generation settings
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesConfig {
    /// Neutral sentence shown when generation is unavailable
    #[serde(default = "default_fallback")]
    pub fallback: String,
    /// Upper bound on a generation call, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// External generator; absent means the fallback text is always used
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
            timeout_ms: default_timeout_ms(),
            generator: None,
        }
    }
}

fn default_bind() -> SocketAddr {
    ([127, 0, 0, 1], 8080).into()
}

fn default_fallback() -> String {
    "Thank you for participating! Your group assignment is confirmed. \
     Please let the research assistant know you are ready to proceed."
        .to_string()
}

fn default_timeout_ms() -> u64 {
    4000
}

impl PortalConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

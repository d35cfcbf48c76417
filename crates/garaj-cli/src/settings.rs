use anyhow::Context;
use garaj_core::config::Config;
use std::path::{Path, PathBuf};

/// Values taken from flags or the environment. Each one, when present,
/// replaces the matching field of the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub bot_token: Option<String>,
    pub operator_chat_id: Option<i64>,
    pub admin_token: Option<String>,
}

/// Resolve the effective config.
///
/// Priority (highest first):
/// 1. flags / environment (`Overrides`)
/// 2. the YAML file at `path`, if it exists
/// 3. built-in defaults
pub fn load(path: &Path, overrides: Overrides) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    if let Some(db) = overrides.database {
        config.database = db;
    }
    if let Some(token) = overrides.bot_token.filter(|t| !t.is_empty()) {
        config.telegram.bot_token = Some(token);
    }
    if let Some(id) = overrides.operator_chat_id {
        config.operator_chat_id = id;
    }
    if let Some(token) = overrides.admin_token.filter(|t| !t.is_empty()) {
        config.server.admin_token = Some(token);
    }
    Ok(config)
}

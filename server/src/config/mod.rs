//! Configuration management: defaults, validation, loading from the environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::AppConfig;

use serde::Serialize;

/// A setting as returned to the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    pub default: String,
    pub description: String,
}

/// Effective settings in declaration order.
pub fn setting_infos(config: &AppConfig) -> Vec<SettingInfo> {
    defaults::keys()
        .filter_map(|key| {
            let def = defaults::DEFAULT_SETTINGS.get(key)?;
            Some(SettingInfo {
                key: key.to_string(),
                value: config.effective_value(key).unwrap_or_default(),
                default: def.default.to_string(),
                description: def.description.to_string(),
            })
        })
        .collect()
}

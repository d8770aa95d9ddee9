//! Runtime application configuration loaded from the environment.

use image_processor::{CanvasLimits, ContextPolicy};

use super::defaults::get_default;
use super::validation::validate_setting;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub merge_concurrency: usize,
    pub max_upload_bytes: usize,
    pub canvas_max_side: u32,
    pub canvas_max_pixels: u64,
    pub merge_context: ContextPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            merge_concurrency: 1,
            max_upload_bytes: 100 * 1024 * 1024,
            canvas_max_side: CanvasLimits::DEFAULT_MAX_SIDE,
            canvas_max_pixels: CanvasLimits::DEFAULT_MAX_PIXELS,
            merge_context: ContextPolicy::Auto,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing, empty, or invalid values.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String { setting(&lookup, key) };
        let defaults = Self::default();

        Self {
            server_port: parse_or(&g("SERVER_PORT"), defaults.server_port),
            merge_concurrency: parse_or(&g("MERGE_CONCURRENCY"), defaults.merge_concurrency),
            max_upload_bytes: parse_or(&g("MAX_UPLOAD_BYTES"), defaults.max_upload_bytes),
            canvas_max_side: parse_or(&g("CANVAS_MAX_SIDE"), defaults.canvas_max_side),
            canvas_max_pixels: parse_or(&g("CANVAS_MAX_PIXELS"), defaults.canvas_max_pixels),
            merge_context: parse_or(&g("MERGE_CONTEXT"), defaults.merge_context),
        }
    }

    pub fn canvas_limits(&self) -> CanvasLimits {
        CanvasLimits::new(self.canvas_max_side, self.canvas_max_pixels)
    }

    /// Effective value of every setting, as text.
    pub fn effective_value(&self, key: &str) -> Option<String> {
        let value = match key {
            "SERVER_PORT" => self.server_port.to_string(),
            "MERGE_CONCURRENCY" => self.merge_concurrency.to_string(),
            "MAX_UPLOAD_BYTES" => self.max_upload_bytes.to_string(),
            "CANVAS_MAX_SIDE" => self.canvas_max_side.to_string(),
            "CANVAS_MAX_PIXELS" => self.canvas_max_pixels.to_string(),
            "MERGE_CONTEXT" => match self.merge_context {
                ContextPolicy::Auto => "auto".to_string(),
                ContextPolicy::CanvasOnly => "canvas".to_string(),
                ContextPolicy::NativeOnly => "native".to_string(),
            },
            _ => return None,
        };
        Some(value)
    }
}

/// Raw value for `key`, or its default when unset or invalid.
fn setting(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> String {
    let default = get_default(key).unwrap_or_default();
    let Some(value) = lookup(key).map(|v| v.trim().to_string()) else {
        return default.to_string();
    };
    if value.is_empty() {
        return default.to_string();
    }
    if let Err(e) = validate_setting(key, &value) {
        tracing::warn!("Ignoring {key}={value:?} ({e}), using default {default}");
        return default.to_string();
    }
    value
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

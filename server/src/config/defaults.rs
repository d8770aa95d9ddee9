//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("SERVER_PORT", "8080", "HTTP listen port"),
    (
        "MERGE_CONCURRENCY",
        "1",
        "Merges allowed to run codec work at the same time",
    ),
    (
        "MAX_UPLOAD_BYTES",
        "104857600",
        "Largest accepted request body in bytes",
    ),
    (
        "CANVAS_MAX_SIDE",
        "32767",
        "Longest canvas side the canvas context accepts",
    ),
    (
        "CANVAS_MAX_PIXELS",
        "268435456",
        "Largest canvas pixel count the canvas context accepts",
    ),
    (
        "MERGE_CONTEXT",
        "auto",
        "Default execution context: auto, canvas or native",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Setting keys in declaration order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|&(key, _, _)| key)
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

use crate::config::{SearchConfig, Translations};

/// Highest manifest version this build understands.
pub const MANIFEST_VERSION: u32 = 1;

/// `manifest.json` at the root of a build input directory.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InputManifest {
    pub version: u32,
    /// Page files relative to the manifest, in navigation order.
    pub documents: Vec<String>,
    /// Locale for pages that don't declare one.
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub translations: Translations,
}

fn default_locale() -> String {
    "en".to_string()
}

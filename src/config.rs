//! Startup configuration document
//!
//! The page may embed a JSON document in
//! `<script id="game-config" type="application/json">`. Any missing field falls
//! back to its default.

use serde::{Deserialize, Serialize};

use crate::assets::AssetManifest;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// DOM id of the embedded config element
pub const CONFIG_ELEMENT_ID: &str = "game-config";

/// Everything the game reads at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tuning: Tuning,
    pub settings: Settings,
    pub assets: AssetManifest,
}

impl GameConfig {
    /// Parse a config document and clamp it into a playable range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn sanitized(self) -> Self {
        Self {
            tuning: self.tuning.sanitized(),
            settings: self.settings.sanitized(),
            assets: self.assets,
        }
    }

    /// Read the embedded config document (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from #{}", CONFIG_ELEMENT_ID);
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, e);
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default config");
                Self::default()
            }
        }
    }

    /// Native builds have no page to read from
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

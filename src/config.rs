use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigurationError;

const ENV_PREFIX: &str = "FRUITSCAN";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub classification: ClassificationSettings,
    pub nutrition: NutritionSettings,
    #[serde(default)]
    pub capture: CaptureSettings,
    #[serde(default = "default_command_buffer_size")]
    pub command_buffer_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationSettings {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NutritionSettings {
    pub base_url: String,
    // Credential pair for the nutrition service. Optional at load time;
    // enrichment refuses to run without them.
    pub app_id: Option<String>,
    pub app_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureSettings {
    pub photo_path: Option<PathBuf>,
}

fn default_command_buffer_size() -> usize {
    16
}

impl Settings {
    // Environment variables override the defaults, e.g.
    // FRUITSCAN__NUTRITION__APP_ID=... FRUITSCAN__NUTRITION__APP_KEY=...
    pub fn load() -> Result<Self, ConfigurationError> {
        let loaded = config::Config::builder()
            .set_default("classification.base_url", "http://127.0.0.1:5003")?
            .set_default("nutrition.base_url", "https://api.edamam.com/api")?
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        Ok(loaded.try_deserialize()?)
    }
}

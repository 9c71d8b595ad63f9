use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Configuration for an API key
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApiKeyConfig {
    pub name: String,
    pub key: Option<String>,
    pub is_configured: bool,
}

/// Response for settings endpoint
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingsResponse {
    pub config_file_path: String,
    pub api_keys: Vec<ApiKeyConfig>,
}

/// Request to update API keys
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateApiKeysRequest {
    pub openai_api_key: Option<String>,
}

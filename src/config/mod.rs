mod manager;

pub use manager::{
    API_KEY_ENV, ConfigFile, ConfigManager, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_SYSTEM_MESSAGE, DEFAULT_TEMPERATURE, MAX_TEMPERATURE, Settings, SettingsOverrides,
    resolve_settings, validate_temperature,
};

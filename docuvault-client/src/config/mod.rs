use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub storage: StorageSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Deserialize, Clone)]
pub struct ApiSettings {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone)]
pub struct StorageSettings {
    /// Directory holding the persisted token files.
    pub token_dir: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    // Check if we're already in docuvault-client directory or need to navigate to it
    let configuration_directory = if base_path.ends_with("docuvault-client") {
        base_path.join("config")
    } else {
        base_path.join("docuvault-client").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

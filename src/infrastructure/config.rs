use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub storage: StorageSettings,
    pub countdown: CountdownSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the REST backend, e.g. `http://localhost:8000`
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Object store form-post endpoint; `${bucket}` is replaced per upload
    pub endpoint_template: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CountdownSettings {
    pub tick_ms: u64,
}

impl CountdownSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

fn settings_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("backend.base_url", "http://localhost:8000")?
        .set_default("storage.endpoint_template", "https://${bucket}.s3.amazonaws.com/")?
        .set_default("countdown.tick_ms", 1000)
}

/// Load `config/app.*` (optional) with `PROGRESS__SECTION__KEY` overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = settings_builder()?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(config::Environment::with_prefix("PROGRESS").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a template string
pub fn fill_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

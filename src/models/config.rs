use serde::Deserialize;

/// Configuration options of the inventory service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Path to the SQLite database file.
    pub database_url: String,
    /// Glob matching the Tera templates.
    pub templates_dir: String,
    /// Signing key for flash message cookies, at least 64 bytes.
    pub secret: String,
}

#[cfg(feature = "server")]
impl ServerConfig {
    /// Loads `config/default.yaml`, then `config/{APP_ENV}.yaml` when present,
    /// then `APP_`-prefixed environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(config::Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}

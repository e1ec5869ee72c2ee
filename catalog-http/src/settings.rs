use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "CATALOG_ENV";
const CONFIG_DIR_ENV: &str = "CATALOG_CONFIG_DIR";
const ENV_PREFIX: &str = "CATALOG";

/// Plain variable names older deployments set, and the setting each one feeds.
const STORAGE_ALIASES: [(&str, &str); 2] = [
    ("MONGO_URL", "STORAGE__MONGO_URL"),
    ("MONGO_DATABASE_NAME", "STORAGE__DATABASE"),
];

/// Deployment environment the service is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(name: &str) -> anyhow::Result<Self> {
        match name {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay and
    /// `CATALOG__*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            // Default to the `config` directory under the working directory.
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from `config_dir` for the named environment.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        Self::load_layered(
            config_dir,
            environment,
            storage_aliases(|name| std::env::var(name).ok()),
        )
    }

    /// `aliases` sit between the files and the `CATALOG__*` variables.
    fn load_layered(
        config_dir: &Path,
        environment: &str,
        aliases: config::Map<String, String>,
    ) -> anyhow::Result<Self> {
        let parsed_environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let cfg = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .source(Some(aliases)),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parsed_environment;

        Ok(settings)
    }
}

/// Collects the alias variables that are set, keyed by the setting they feed.
fn storage_aliases(lookup: impl Fn(&str) -> Option<String>) -> config::Map<String, String> {
    STORAGE_ALIASES
        .iter()
        .filter_map(|(name, key)| lookup(name).map(|value| (key.to_string(), value)))
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Which storage adapter backs the catalog.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    Mongodb,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "StorageSettings::default_mongo_url")]
    pub mongo_url: String,
    #[serde(default = "StorageSettings::default_database")]
    pub database: String,
    #[serde(default = "StorageSettings::default_collection")]
    pub collection: String,
}

impl StorageSettings {
    fn default_mongo_url() -> String {
        "mongodb://localhost:27017/".to_string()
    }

    fn default_database() -> String {
        "local".to_string()
    }

    fn default_collection() -> String {
        "books".to_string()
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            mongo_url: Self::default_mongo_url(),
            database: Self::default_database(),
            collection: Self::default_collection(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("catalog-settings-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_storage_is_local_mongodb() {
        let settings = Settings::default();
        assert_eq!(settings.storage.backend, StorageBackend::Mongodb);
        assert_eq!(settings.storage.mongo_url, "mongodb://localhost:27017/");
        assert_eq!(settings.storage.database, "local");
        assert_eq!(settings.storage.collection, "books");
    }

    #[test]
    fn default_server_address() {
        assert_eq!(ServerSettings::default().address(), "0.0.0.0:8080");
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let dir = scratch_dir();
        let settings = Settings::load_from(&dir, "local").unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);
    }

    #[test]
    fn environment_file_overlays_base() {
        let dir = scratch_dir();
        std::fs::write(
            dir.join("base.toml"),
            "[server]\nport = 9000\n\n[storage]\nbackend = \"memory\"\ndatabase = \"catalog\"\n",
        )
        .unwrap();
        std::fs::write(dir.join("staging.toml"), "[storage]\ndatabase = \"catalog_staging\"\n").unwrap();

        let settings = Settings::load_from(&dir, "staging").unwrap();

        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.storage.database, "catalog_staging");
    }

    #[test]
    fn mongo_aliases_override_files() {
        let dir = scratch_dir();
        std::fs::write(dir.join("base.toml"), "[storage]\ndatabase = \"catalog\"\n").unwrap();

        let aliases = storage_aliases(|name| match name {
            "MONGO_URL" => Some("mongodb://db:27017/".to_string()),
            "MONGO_DATABASE_NAME" => Some("library".to_string()),
            _ => None,
        });
        let settings = Settings::load_layered(&dir, "local", aliases).unwrap();

        assert_eq!(settings.storage.mongo_url, "mongodb://db:27017/");
        assert_eq!(settings.storage.database, "library");
    }

    #[test]
    fn unset_aliases_leave_defaults() {
        let dir = scratch_dir();
        let settings = Settings::load_layered(&dir, "local", storage_aliases(|_| None)).unwrap();

        assert_eq!(settings.storage.mongo_url, "mongodb://localhost:27017/");
        assert_eq!(settings.storage.database, "local");
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let dir = scratch_dir();
        assert!(Settings::load_from(&dir, "qa").is_err());
    }
}

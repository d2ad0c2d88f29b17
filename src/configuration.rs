use crate::domain::TopicId;
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use reqwest::Url;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::time::Duration;

/// Retrive the configuration for the application.
///
/// Values are layered: `configuration.yaml`, then the optional file named by
/// `APP_CONFIG`, then `APP_<SECTION>__<KEY>` environment variables.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let mut builder =
        Config::builder().add_source(File::new("configuration.yaml", FileFormat::Yaml));

    if let Ok(path) = std::env::var("APP_CONFIG") {
        builder = builder.add_source(File::with_name(&path).required(false));
    }

    builder
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub store: StoreSettings,
    /// Without a database, signups are kept in memory.
    pub database: Option<DatabaseSettings>,
    pub notifier: NotifierSettings,
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// Theme the landing page is rendered with.
    pub theme: String,
    #[serde(default)]
    pub debug: bool,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct StoreSettings {
    /// Field of a signup that uniquely identifies it.
    pub key_attribute: String,
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    #[serde(default)]
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct NotifierSettings {
    #[getter(skip)]
    base_url: String,
    pub topic: TopicId,
    authorization_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    timeout_milliseconds: u64,
}

impl NotifierSettings {
    /// Base url of the pub/sub backend, always ending with a `/` so topic
    /// paths are appended to it.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.base_url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    /// Point the notifier at another pub/sub backend.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }
}

//! Application configuration module
//!
//! `AppConfig` is built once at startup (from the environment or through the
//! builder in tests) and handed to the server. Nothing else in the crate
//! reads environment variables.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Port used when `SERVER_PORT` is unset
pub const DEFAULT_PORT: u16 = 5000;
/// Token lifetime used when `TOKEN_TTL_SECS` is unset
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60;
/// Same value as `bcrypt::DEFAULT_COST`
pub const DEFAULT_BCRYPT_COST: u32 = 12;
/// Folder passed to the object-storage service
pub const DEFAULT_MEDIA_FOLDER: &str = "ridehub";

const DEV_JWT_SECRET: &str = "ridehub-development-secret";

/// External object-storage upload settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConfig {
    /// Upload endpoint, e.g. `https://api.cloudinary.com/v1_1/<cloud>/auto/upload`
    pub upload_url: String,
    /// Unsigned upload preset, if the service needs one
    pub upload_preset: Option<String>,
    /// Destination folder
    pub folder: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listening port
    pub port: u16,
    /// PostgreSQL URL; the in-memory store is used when absent
    pub database_url: Option<String>,
    /// Shared secret used to sign bearer tokens
    pub jwt_secret: String,
    /// Bearer token lifetime
    pub token_ttl: Duration,
    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
    /// Local directory for uploads, served under `/uploads`
    pub uploads_dir: PathBuf,
    /// Remote media relay; local storage is used when absent
    pub media: Option<MediaConfig>,
    /// Serve the frontend bundle for non-API routes
    pub production: bool,
    /// Location of the prebuilt frontend bundle
    pub frontend_dir: PathBuf,
    /// Emails that register with the `admin` role, lowercase
    pub admin_emails: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            uploads_dir: PathBuf::from("uploads"),
            media: None,
            production: false,
            frontend_dir: PathBuf::from("client/build"),
            admin_emails: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let production = get("APP_ENV").as_deref() == Some("production");

        let mut builder = Self::builder().production(production);

        if let Some(port) = get("SERVER_PORT").or_else(|| get("PORT")) {
            let port = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT", port))?;
            builder = builder.port(port);
        }
        if let Some(url) = get("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        match get("JWT_SECRET") {
            Some(secret) => builder = builder.jwt_secret(secret),
            None if production => return Err(ConfigError::MissingValue("JWT_SECRET")),
            None => tracing::warn!("JWT_SECRET not set, using the development secret"),
        }
        if let Some(ttl) = get("TOKEN_TTL_SECS") {
            let secs = ttl
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue("TOKEN_TTL_SECS", ttl))?;
            builder = builder.token_ttl(Duration::from_secs(secs));
        }
        if let Some(cost) = get("BCRYPT_COST") {
            let cost = cost
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue("BCRYPT_COST", cost))?;
            builder = builder.bcrypt_cost(cost);
        }
        if let Some(dir) = get("UPLOADS_DIR") {
            builder = builder.uploads_dir(dir);
        }
        if let Some(dir) = get("FRONTEND_DIR") {
            builder = builder.frontend_dir(dir);
        }
        if let Some(emails) = get("ADMIN_EMAILS") {
            builder = builder.admin_emails(emails.split(','));
        }
        if let Some(upload_url) = get("MEDIA_UPLOAD_URL") {
            builder = builder.media(MediaConfig {
                upload_url,
                upload_preset: get("MEDIA_UPLOAD_PRESET"),
                folder: get("MEDIA_FOLDER").unwrap_or_else(|| DEFAULT_MEDIA_FOLDER.to_string()),
            });
        }

        builder.build()
    }

    /// Whether an account registering with `email` becomes an admin
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|admin| *admin == email)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.token_ttl.is_zero() {
            return Err(ConfigError::InvalidValue("TOKEN_TTL_SECS", "0".to_string()));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue(
                "BCRYPT_COST",
                self.bcrypt_cost.to_string(),
            ));
        }
        if let Some(media) = &self.media {
            if !(media.upload_url.starts_with("http://") || media.upload_url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(media.upload_url.clone()));
            }
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the listening port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Use PostgreSQL at this URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    /// Set the token signing secret
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    /// Set the token lifetime
    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.config.token_ttl = ttl;
        self
    }

    /// Set the bcrypt work factor
    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config.bcrypt_cost = cost;
        self
    }

    /// Set the local uploads directory
    pub fn uploads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.uploads_dir = dir.into();
        self
    }

    /// Relay uploads to an external object store
    pub fn media(mut self, media: MediaConfig) -> Self {
        self.config.media = Some(media);
        self
    }

    /// Toggle production mode
    pub fn production(mut self, production: bool) -> Self {
        self.config.production = production;
        self
    }

    /// Set the frontend bundle directory
    pub fn frontend_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.frontend_dir = dir.into();
        self
    }

    /// Emails that register as admins; blanks are dropped
    pub fn admin_emails<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.admin_emails = emails
            .into_iter()
            .map(|email| email.as_ref().trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

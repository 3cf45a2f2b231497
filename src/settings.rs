use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// SMTP relay for contact-form notifications and message replies.
    /// Email is optional; without it sends are skipped and logged.
    #[serde(default)]
    pub smtp_host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    #[serde(default)]
    pub admin_email: Option<String>,

    /// Media CDN (Cloudinary-style unsigned upload API).
    #[serde(default)]
    pub cdn_base_url: Option<String>,

    #[serde(default)]
    pub cdn_api_key: Option<String>,

    #[serde(default)]
    pub cdn_api_secret: Option<String>,

    /// Site owner identity, used when drafting outreach email.
    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    #[serde(default)]
    pub owner_bio: String,

    /// AI draft provider endpoint and key; absent means drafting is disabled.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    #[serde(default)]
    pub ai_api_key: Option<String>,

    #[serde(default = "default_contact_rate_limit")]
    pub contact_rate_limit: u64,

    #[serde(default = "default_contact_rate_window_secs")]
    pub contact_rate_window_secs: u64,

    #[serde(default = "default_notification_retention_days")]
    pub notification_retention_days: i64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_smtp_port() -> u16 {
    587
}
fn default_mail_from() -> String {
    "Portfolio <no-reply@localhost>".to_string()
}
fn default_owner_name() -> String {
    "Site owner".to_string()
}
fn default_contact_rate_limit() -> u64 {
    5
}
fn default_contact_rate_window_secs() -> u64 {
    3600
}
fn default_notification_retention_days() -> i64 {
    30
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name.to_string().to_lowercase())).required(false))
            .add_source(Environment::with_prefix("APP").separator("_").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Inject critical env values if missing
        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty".to_string());
        }
        if self.contact_rate_limit == 0 {
            errors.push("CONTACT_RATE_LIMIT must be at least 1".to_string());
        }
        if self.contact_rate_window_secs == 0 {
            errors.push("CONTACT_RATE_WINDOW_SECS must be at least 1".to_string());
        }
        if self.smtp_host.is_some() && self.admin_email.is_none() {
            errors.push("ADMIN_EMAIL must be set when SMTP is configured".to_string());
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self {
            Some(s) if !s.is_empty() => "[REDACTED]",
            _ => "[MISSING]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username.redact())
            .field("smtp_password", &self.smtp_password.redact())
            .field("mail_from", &self.mail_from)
            .field("admin_email", &self.admin_email)
            .field("cdn_base_url", &self.cdn_base_url)
            .field("cdn_api_key", &self.cdn_api_key.redact())
            .field("cdn_api_secret", &self.cdn_api_secret.redact())
            .field("owner_name", &self.owner_name)
            .field("ai_api_url", &self.ai_api_url)
            .field("ai_api_key", &self.ai_api_key.redact())
            .field("contact_rate_limit", &self.contact_rate_limit)
            .field("contact_rate_window_secs", &self.contact_rate_window_secs)
            .field("notification_retention_days", &self.notification_retention_days)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("PRODUCTION".parse::<AppEnvironment>().unwrap(), AppEnvironment::Production);
        assert!("staging".parse::<AppEnvironment>().is_err());
    }

    #[test]
    fn cors_origins_split_on_commas() {
        let mut config = test_config();
        config.cors_allowed_origins = vec!["https://a.dev, https://b.dev".into(), "https://c.dev".into()];
        assert_eq!(config.cors_origins(), vec!["https://a.dev", "https://b.dev", "https://c.dev"]);
    }

    #[test]
    fn production_rejects_wildcard_cors() {
        let mut config = test_config();
        config.env = AppEnvironment::Production;
        config.cors_allowed_origins = vec!["*".into()];
        assert!(config.validate().is_err());
    }

    fn test_config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/test".into(),
            cors_allowed_origins: default_cors_origins(),
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            mail_from: default_mail_from(),
            admin_email: None,
            cdn_base_url: None,
            cdn_api_key: None,
            cdn_api_secret: None,
            owner_name: default_owner_name(),
            owner_bio: String::new(),
            ai_api_url: None,
            ai_api_key: None,
            contact_rate_limit: default_contact_rate_limit(),
            contact_rate_window_secs: default_contact_rate_window_secs(),
            notification_retention_days: default_notification_retention_days(),
        }
    }
}

use std::env;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Main configuration container for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application identity and public URLs
    pub app: AppConfig,
    /// Token signing and password hashing settings
    pub auth: AuthConfig,
    /// Outgoing mail settings
    pub smtp: SmtpConfig,
    /// Media storage settings
    pub media: MediaConfig,
    /// Logging configuration settings
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            auth: AuthConfig::default(),
            smtp: SmtpConfig::default(),
            media: MediaConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables or use defaults
    pub fn load() -> Self {
        Self {
            app: AppConfig::load(),
            auth: AuthConfig::load(),
            smtp: SmtpConfig::load(),
            media: MediaConfig::load(),
            logging: LoggingConfig::load(),
        }
    }
}

/// Application identity and the URLs embedded in issued links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application display name used in email subjects
    pub name: String,
    /// Public web frontend URL (activation and reset links)
    pub web_url: String,
    /// Public API base URL (media links)
    pub api_url: String,
    /// Upper bound for a single store/media/dispatch call, in seconds
    pub operation_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "identity-server".to_string(),
            web_url: "http://localhost:8080".to_string(),
            api_url: "http://localhost:3000".to_string(),
            operation_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables or use defaults
    pub fn load() -> Self {
        let name = env::var("APP_NAME").unwrap_or_else(|_| "identity-server".to_string());
        let web_url = env::var("APP_WEB_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
        let api_url = env::var("APP_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let operation_timeout_secs = env::var("OPERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(30);

        Self {
            name,
            web_url,
            api_url,
            operation_timeout_secs,
        }
    }

    /// Operation timeout as a std Duration
    pub fn operation_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.operation_timeout_secs)
    }
}

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key used to sign and verify tokens
    pub jwt_secret: String,
    /// Login token lifetime in days
    pub login_expiry_days: i64,
    /// Registration/activation token lifetime in days
    pub registration_expiry_days: i64,
    /// Password recovery token lifetime in days
    pub recovery_expiry_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "insecure-development-secret".to_string(),
            login_expiry_days: 1,
            registration_expiry_days: 30,
            recovery_expiry_days: 1,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables or use defaults
    pub fn load() -> Self {
        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "insecure-development-secret".to_string());
        let login_expiry_days = env::var("JWT_LOGIN_EXPIRY_DAYS")
            .ok()
            .and_then(|d| d.parse::<i64>().ok())
            .unwrap_or(1);
        let registration_expiry_days = env::var("JWT_REGISTRATION_EXPIRY_DAYS")
            .ok()
            .and_then(|d| d.parse::<i64>().ok())
            .unwrap_or(30);
        let recovery_expiry_days = env::var("JWT_RECOVERY_EXPIRY_DAYS")
            .ok()
            .and_then(|d| d.parse::<i64>().ok())
            .unwrap_or(1);

        Self {
            jwt_secret,
            login_expiry_days,
            registration_expiry_days,
            recovery_expiry_days,
        }
    }

    /// Login token lifetime
    pub fn login_expiry(&self) -> Duration {
        Duration::days(self.login_expiry_days)
    }

    /// Registration token lifetime
    pub fn registration_expiry(&self) -> Duration {
        Duration::days(self.registration_expiry_days)
    }

    /// Recovery token lifetime
    pub fn recovery_expiry(&self) -> Duration {
        Duration::days(self.recovery_expiry_days)
    }
}

/// Outgoing SMTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host
    pub host: String,
    /// SMTP relay port
    pub port: u16,
    /// Use TLS when connecting to the relay
    pub secure: bool,
    /// SMTP account username
    pub username: String,
    /// SMTP account password
    pub password: String,
    /// Sender address for outgoing mail
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            secure: false,
            username: String::new(),
            password: String::new(),
            from: "no-reply@localhost".to_string(),
        }
    }
}

impl SmtpConfig {
    /// Load configuration from environment variables or use defaults
    pub fn load() -> Self {
        let host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(587);
        let secure = env::var("SMTP_SECURE")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);
        let username = env::var("SMTP_USER").unwrap_or_default();
        let password = env::var("SMTP_PASS").unwrap_or_default();
        let from = env::var("SMTP_FROM").unwrap_or_else(|_| {
            if username.is_empty() {
                "no-reply@localhost".to_string()
            } else {
                username.clone()
            }
        });

        Self {
            host,
            port,
            secure,
            username,
            password,
            from,
        }
    }
}

/// Media storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Root directory for media files
    pub root: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: "media".to_string(),
        }
    }
}

impl MediaConfig {
    /// Load configuration from environment variables or use defaults
    pub fn load() -> Self {
        let root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
        Self { root }
    }

    /// Directory avatar files are written under
    pub fn avatar_dir(&self) -> PathBuf {
        PathBuf::from(&self.root).join("avatar")
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON formatted logs
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Load configuration from environment variables or use defaults
    pub fn load() -> Self {
        let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let json = env::var("LOG_FORMAT")
            .map(|v| v.to_lowercase() == "json")
            .unwrap_or(false);

        Self { level, json }
    }
}

pub mod settings;

pub use settings::{AppConfig, AuthConfig, Config, LoggingConfig, MediaConfig, SmtpConfig};

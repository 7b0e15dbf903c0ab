use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::documents::DocumentSettings;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub documents: DocumentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            documents: DocumentConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Document rendering inputs: stamped values, template lookup, and the PDF converter.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub support_email: String,
    pub signature: String,
    pub tax_rate: Decimal,
    pub base_uri: String,
    pub template_prefix: String,
    pub pdf_command: String,
    pub applications_file: Option<PathBuf>,
}

impl DocumentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_tax_rate = env::var("DOCS_TAX_RATE").unwrap_or_else(|_| "0.15".to_string());
        let tax_rate = Decimal::from_str(raw_tax_rate.trim()).map_err(|source| {
            ConfigError::InvalidTaxRate {
                value: raw_tax_rate.clone(),
                source,
            }
        })?;

        Ok(Self {
            support_email: env::var("DOCS_SUPPORT_EMAIL")
                .unwrap_or_else(|_| "support@example.com".to_string()),
            signature: env::var("DOCS_SIGNATURE").unwrap_or_else(|_| "Client Services".to_string()),
            tax_rate,
            base_uri: env::var("DOCS_BASE_URI").unwrap_or_else(|_| ".".to_string()),
            template_prefix: env::var("DOCS_TEMPLATE_PREFIX")
                .unwrap_or_else(|_| "/templates".to_string()),
            pdf_command: env::var("DOCS_PDF_COMMAND").unwrap_or_else(|_| "wkhtmltopdf".to_string()),
            applications_file: env::var_os("DOCS_APPLICATIONS_FILE").map(PathBuf::from),
        })
    }

    pub fn settings(&self) -> DocumentSettings {
        DocumentSettings {
            support_email: self.support_email.clone(),
            signature: self.signature.clone(),
            tax_rate: self.tax_rate,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidTaxRate {
        value: String,
        source: rust_decimal::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTaxRate { value, .. } => {
                write!(f, "DOCS_TAX_RATE must be a decimal number, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidTaxRate { source, .. } => Some(source),
        }
    }
}

/// Configuration management for the movie API
use crate::error::{ApiError, ApiResult};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Main server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub authentication: AuthConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database_path: PathBuf,
    pub max_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of an access token in seconds
    pub access_token_ttl: i64,
    pub password_storage: PasswordStorageMode,
    pub bcrypt_cost: u32,
}

/// How user passwords are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStorageMode {
    /// Stored and compared verbatim. Compatible with existing databases, insecure.
    Plaintext,
    Bcrypt,
}

impl FromStr for PasswordStorageMode {
    type Err = ApiError;

    fn from_str(s: &str) -> ApiResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" => Ok(PasswordStorageMode::Plaintext),
            "bcrypt" => Ok(PasswordStorageMode::Bcrypt),
            other => Err(ApiError::Validation(format!(
                "Unknown password storage mode: {}",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

/// Two hours, matching the token window existing clients expect
pub const DEFAULT_ACCESS_TOKEN_TTL: i64 = 2 * 60 * 60;

/// Parse `key` if set, else `default`; a value that does not parse is a validation error
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    what: &str,
) -> ApiResult<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::Validation(format!("Invalid {}: {}", what, raw))),
        None => Ok(default),
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let hostname = lookup("MOVIE_API_HOSTNAME").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_var(&lookup, "MOVIE_API_PORT", 5000u16, "port number")?;

        let data_directory: PathBuf = lookup("MOVIE_API_DATA_DIRECTORY")
            .unwrap_or_else(|| "./data".to_string())
            .into();
        let database_path = lookup("MOVIE_API_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_directory.join("data.db"));
        let max_connections =
            parse_var(&lookup, "MOVIE_API_DB_MAX_CONNECTIONS", 10u32, "connection count")?;

        let jwt_secret = lookup("MOVIE_API_JWT_SECRET")
            .ok_or_else(|| ApiError::Validation("JWT secret required".to_string()))?;
        let access_token_ttl = parse_var(
            &lookup,
            "MOVIE_API_ACCESS_TOKEN_TTL_SECS",
            DEFAULT_ACCESS_TOKEN_TTL,
            "access token TTL",
        )?;
        let password_storage = match lookup("MOVIE_API_PASSWORD_STORAGE") {
            Some(raw) => raw.parse::<PasswordStorageMode>()?,
            None => PasswordStorageMode::Plaintext,
        };
        let bcrypt_cost = parse_var(
            &lookup,
            "MOVIE_API_BCRYPT_COST",
            bcrypt::DEFAULT_COST,
            "bcrypt cost",
        )?;

        let level = lookup("RUST_LOG")
            .unwrap_or_else(|| "movie_api=debug,tower_http=debug".to_string());
        let json = match lookup("MOVIE_API_LOG_FORMAT") {
            None => false,
            Some(format) => match format.trim().to_ascii_lowercase().as_str() {
                "pretty" => false,
                "json" => true,
                _ => {
                    return Err(ApiError::Validation(format!(
                        "Unknown log format: {}",
                        format
                    )))
                }
            },
        };

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            storage: StorageConfig {
                data_directory,
                database_path,
                max_connections,
            },
            authentication: AuthConfig {
                jwt_secret,
                access_token_ttl,
                password_storage,
                bcrypt_cost,
            },
            logging: LoggingConfig { level, json },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.authentication.jwt_secret.len() < 32 {
            return Err(ApiError::Validation(
                "JWT secret must be at least 32 characters".to_string(),
            ));
        }

        if self.authentication.access_token_ttl <= 0 {
            return Err(ApiError::Validation(
                "Access token TTL must be positive".to_string(),
            ));
        }

        if !(4..=31).contains(&self.authentication.bcrypt_cost) {
            return Err(ApiError::Validation(
                "bcrypt cost must be between 4 and 31".to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(ApiError::Validation(
                "Database pool needs at least one connection".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> ServerConfig {
    ServerConfig {
        service: ServiceConfig {
            hostname: "127.0.0.1".to_string(),
            port: 5000,
        },
        storage: StorageConfig {
            data_directory: PathBuf::from("./data"),
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
        },
        authentication: AuthConfig {
            jwt_secret: "test-secret-key-for-testing-only-0123".to_string(),
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            password_storage: PasswordStorageMode::Plaintext,
            bcrypt_cost: 4,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            json: false,
        },
    }
}

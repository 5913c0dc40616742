use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub uploads: UploadConfig,
    pub oauth: OAuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HMAC key shared by API bearer tokens and session cookies
    #[serde(skip_serializing)]
    pub secret_key: String,
    pub api_token_ttl_secs: u64,
    pub session_ttl_hours: u64,
    pub secure_cookies: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub directory: PathBuf,
    /// Compared case-sensitively against the text after the last `.`
    pub allowed_extensions: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub redirect_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("CATALOG_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("CATALOG_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("CATALOG_SECRET_KEY") {
            if !v.trim().is_empty() {
                self.security.secret_key = v;
            }
        }
        if let Ok(v) = env::var("API_TOKEN_TTL_SECS") {
            self.security.api_token_ttl_secs = v.parse().unwrap_or(self.security.api_token_ttl_secs);
        }
        if let Ok(v) = env::var("SESSION_TTL_HOURS") {
            self.security.session_ttl_hours = v.parse().unwrap_or(self.security.session_ttl_hours);
        }
        if let Ok(v) = env::var("SECURITY_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }

        // Upload overrides
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.uploads.directory = PathBuf::from(v);
        }
        if let Ok(v) = env::var("UPLOAD_ALLOWED_EXTENSIONS") {
            self.uploads.allowed_extensions = split_list(&v);
        }
        if let Ok(v) = env::var("UPLOAD_MAX_BYTES") {
            self.uploads.max_upload_bytes = v.parse().unwrap_or(self.uploads.max_upload_bytes);
        }

        // OAuth overrides
        if let Ok(v) = env::var("GOOGLE_CLIENT_ID") {
            self.oauth.client_id = v;
        }
        if let Ok(v) = env::var("GOOGLE_CLIENT_SECRET") {
            self.oauth.client_secret = v;
        }
        if let Ok(v) = env::var("OAUTH_REDIRECT_URL") {
            self.oauth.redirect_url = v;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite://itemcatalog.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                secret_key: ephemeral_secret(),
                api_token_ttl_secs: 600,
                session_ttl_hours: 24,
                secure_cookies: false,
                enable_cors: true,
                cors_origins: Vec::new(),
            },
            uploads: UploadConfig {
                directory: PathBuf::from("uploads"),
                allowed_extensions: default_extensions(),
                max_upload_bytes: 10 * 1024 * 1024, // 10MB
            },
            oauth: OAuthConfig {
                client_id: String::new(),
                client_secret: String::new(),
                redirect_url: "http://localhost:5000/oauth/callback".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: "sqlite://itemcatalog.db".to_string(),
                max_connections: 10,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                secret_key: ephemeral_secret(),
                api_token_ttl_secs: 600,
                session_ttl_hours: 12,
                secure_cookies: true,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            uploads: UploadConfig {
                directory: PathBuf::from("uploads"),
                allowed_extensions: default_extensions(),
                max_upload_bytes: 5 * 1024 * 1024, // 5MB
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: "sqlite://itemcatalog.db".to_string(),
                max_connections: 20,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                secret_key: ephemeral_secret(),
                api_token_ttl_secs: 600,
                session_ttl_hours: 4,
                secure_cookies: true,
                enable_cors: false,
                cors_origins: Vec::new(),
            },
            uploads: UploadConfig {
                directory: PathBuf::from("/var/lib/item-catalog/uploads"),
                allowed_extensions: default_extensions(),
                max_upload_bytes: 2 * 1024 * 1024, // 2MB
            },
            ..Self::development()
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn default_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif"].iter().map(|s| s.to_string()).collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Random per-process key, used when CATALOG_SECRET_KEY is not set.
/// Tokens and sessions do not survive a restart with it.
fn ephemeral_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

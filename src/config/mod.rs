use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Webhook notified when a rendered path becomes stale. Empty disables
    /// the signal (revalidation is then log-only).
    pub revalidate_webhook: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub name: String,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Shared secret for verifying provider-issued session JWTs.
    pub jwt_secret: String,
    /// Base URL of the provider's management API (metadata writes).
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Upload endpoint of the object store, e.g. https://files.example.com/storage/v1/object
    pub endpoint: String,
    pub bucket: String,
    /// Base URL that serves uploaded objects publicly.
    pub public_base: String,
    pub service_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_image_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("SERVER_CORS_ORIGINS") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SERVER_REVALIDATE_WEBHOOK") {
            self.server.revalidate_webhook = v;
        }

        if let Ok(v) = env::var("DATABASE_NAME") {
            self.database.name = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        if let Ok(v) = env::var("IDENTITY_JWT_SECRET") {
            self.identity.jwt_secret = v;
        }
        if let Ok(v) = env::var("IDENTITY_API_URL") {
            self.identity.api_url = v;
        }
        if let Ok(v) = env::var("IDENTITY_API_KEY") {
            self.identity.api_key = v;
        }

        if let Ok(v) = env::var("STORAGE_ENDPOINT") {
            self.storage.endpoint = v;
        }
        if let Ok(v) = env::var("STORAGE_BUCKET") {
            self.storage.bucket = v;
        }
        if let Ok(v) = env::var("STORAGE_PUBLIC_BASE") {
            self.storage.public_base = v;
        }
        if let Ok(v) = env::var("STORAGE_SERVICE_KEY") {
            self.storage.service_key = v;
        }

        if let Ok(v) = env::var("UPLOADS_MAX_IMAGE_BYTES") {
            self.uploads.max_image_bytes = v.parse().unwrap_or(self.uploads.max_image_bytes);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                revalidate_webhook: String::new(),
            },
            database: DatabaseConfig {
                name: "stayaway_dev".to_string(),
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            identity: IdentityConfig {
                jwt_secret: String::new(),
                api_url: "http://localhost:9100".to_string(),
                api_key: String::new(),
            },
            storage: StorageConfig {
                endpoint: "http://localhost:9200/storage/v1/object".to_string(),
                bucket: "stayaway-images".to_string(),
                public_base: "http://localhost:9200/storage/v1/object/public".to_string(),
                service_key: String::new(),
            },
            uploads: UploadConfig {
                max_image_bytes: 1024 * 1024, // 1 MiB
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                cors_origins: vec!["https://app.stayaway.example".to_string()],
                revalidate_webhook: String::new(),
            },
            database: DatabaseConfig {
                name: "stayaway_main".to_string(),
                max_connections: 50,
                connection_timeout_secs: 5,
            },
            identity: IdentityConfig {
                jwt_secret: String::new(),
                api_url: String::new(),
                api_key: String::new(),
            },
            storage: StorageConfig {
                endpoint: String::new(),
                bucket: "stayaway-images".to_string(),
                public_base: String::new(),
                service_key: String::new(),
            },
            uploads: UploadConfig {
                max_image_bytes: 1024 * 1024, // 1 MiB
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub access: AccessConfig,
    pub views: ViewConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

/// Route gating: where visitors are sent and how resolved roles are reused
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    pub sign_in_route: String,
    pub platform_admin_route: String,
    pub admin_route: String,
    pub customer_route: String,
    /// Share resolved roles across guards until sign-in/sign-out invalidates them
    pub cache_roles: bool,
    /// Zero keeps cached roles until explicitly invalidated
    pub role_cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub agenda_window_days: u32,
    pub dashboard_agenda_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub local_store_dir: String,
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
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // API overrides
        if let Ok(v) = env::var("PORTAL_API_PORT").or_else(|_| env::var("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Access overrides
        if let Ok(v) = env::var("ACCESS_SIGN_IN_ROUTE") {
            self.access.sign_in_route = v;
        }
        if let Ok(v) = env::var("ACCESS_PLATFORM_ADMIN_ROUTE") {
            self.access.platform_admin_route = v;
        }
        if let Ok(v) = env::var("ACCESS_ADMIN_ROUTE") {
            self.access.admin_route = v;
        }
        if let Ok(v) = env::var("ACCESS_CUSTOMER_ROUTE") {
            self.access.customer_route = v;
        }
        if let Ok(v) = env::var("ACCESS_CACHE_ROLES") {
            self.access.cache_roles = v.parse().unwrap_or(self.access.cache_roles);
        }
        if let Ok(v) = env::var("ACCESS_ROLE_CACHE_TTL_SECS") {
            self.access.role_cache_ttl_secs = v.parse().unwrap_or(self.access.role_cache_ttl_secs);
        }

        // View overrides
        if let Ok(v) = env::var("VIEWS_AGENDA_WINDOW_DAYS") {
            self.views.agenda_window_days = v.parse().unwrap_or(self.views.agenda_window_days);
        }
        if let Ok(v) = env::var("VIEWS_DASHBOARD_AGENDA_ITEMS") {
            self.views.dashboard_agenda_items = v.parse().unwrap_or(self.views.dashboard_agenda_items);
        }

        // Storage overrides
        if let Ok(v) = env::var("LOCAL_STORE_DIR") {
            self.storage.local_store_dir = v;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: "development-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            access: AccessConfig::default(),
            views: ViewConfig {
                agenda_window_days: 30,
                dashboard_agenda_items: 5,
            },
            storage: StorageConfig {
                local_store_dir: ".portal/local".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            access: AccessConfig {
                role_cache_ttl_secs: 15 * 60,
                ..AccessConfig::default()
            },
            views: ViewConfig {
                agenda_window_days: 30,
                dashboard_agenda_items: 5,
            },
            storage: StorageConfig {
                local_store_dir: "/var/lib/compliance-portal".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
            access: AccessConfig {
                role_cache_ttl_secs: 5 * 60,
                ..AccessConfig::default()
            },
            views: ViewConfig {
                agenda_window_days: 30,
                dashboard_agenda_items: 5,
            },
            storage: StorageConfig {
                local_store_dir: "/var/lib/compliance-portal".to_string(),
            },
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            sign_in_route: "/sign-in".to_string(),
            platform_admin_route: "/platform-admin".to_string(),
            admin_route: "/admin".to_string(),
            customer_route: "/dashboard".to_string(),
            cache_roles: true,
            role_cache_ttl_secs: 0,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

//! Server configuration

/// Server configuration for the storefront.
///
/// # Environment variables
///
/// | variable | default | description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | DATABASE_PATH | almara.db | SQLite database file (`:memory:` for tests) |
/// | PUBLIC_DIR | public | static assets (images, CSS, client JS) |
/// | VIEWS_DIR | views | server-sent HTML pages |
/// | PUBLIC_BASE_URL | — | absolute-URL base; falls back to the Host header |
/// | ENVIRONMENT | development | development \| staging \| production |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API listen port
    pub http_port: u16,
    /// SQLite database path
    pub database_path: String,
    /// Static asset directory, served as the router fallback
    pub public_dir: String,
    /// HTML view directory
    pub views_dir: String,
    /// Base for absolute URLs in pagination links and image/avatar URLs
    pub public_base_url: Option<String>,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "almara.db".into()),
            public_dir: std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".into()),
            views_dir: std::env::var("VIEWS_DIR").unwrap_or_else(|_| "views".into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the parts tests care about.
    pub fn with_overrides(database_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_path = database_path.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

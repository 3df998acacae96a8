use std::net::{IpAddr, SocketAddr};

/// Largest accepted image upload when `MAX_UPLOAD_BYTES` is not set (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Pool size when `DATABASE_MAX_CONNECTIONS` is not set.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub environment: Environment,
    pub log_level: String,
    pub frontend_url: String,
    pub upload_dir: String,
    pub landing_page_dir: String,
    pub max_upload_bytes: usize,
    pub asset_host: Option<AssetHostConfig>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Credentials and target folder for the remote asset host.
///
/// When present, uploaded images are pushed to the host instead of the local upload
/// directory.
#[derive(Clone)]
pub struct AssetHostConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: Option<String>,
}

impl std::fmt::Debug for AssetHostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetHostConfig")
            .field("base_url", &self.base_url)
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `DATABASE_URL`
    /// Optional with defaults: `DATABASE_MAX_CONNECTIONS`, `SERVER_HOST`, `SERVER_PORT`,
    /// `ENVIRONMENT`, `LOG_LEVEL`, `FRONTEND_URL`, `UPLOAD_DIR`, `LANDING_PAGE_DIR`,
    /// `MAX_UPLOAD_BYTES`
    /// Optional: `ASSET_HOST_*`, `ADMIN_EMAIL`, `ADMIN_PASSWORD`
    ///
    /// `PORT` overrides `SERVER_PORT` when the hosting platform provides it.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is not set, or if a numeric or address variable
    /// contains an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let environment = match std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let server_port = std::env::var("PORT")
            .or_else(|_| std::env::var("SERVER_PORT"))
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT / PORT must be a valid u16"))?;

        let default_host = if environment == Environment::Production {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let server_host = std::env::var("SERVER_HOST")
            .unwrap_or_else(|_| default_host.to_string())
            .parse::<IpAddr>()
            .map_err(|_| anyhow::anyhow!("SERVER_HOST must be a valid IP address"))?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        let landing_page_dir = std::env::var("LANDING_PAGE_DIR")
            .unwrap_or_else(|_| "public/landingPages".to_string());

        let database_max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be a positive integer")
                })?,
            Err(_) => DEFAULT_DATABASE_MAX_CONNECTIONS,
        };

        let max_upload_bytes = match std::env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_BYTES must be a positive integer"))?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            database_url,
            database_max_connections,
            server_host,
            server_port,
            environment,
            log_level,
            frontend_url,
            upload_dir,
            landing_page_dir,
            max_upload_bytes,
            asset_host: AssetHostConfig::from_env(),
            admin_email: non_empty_var("ADMIN_EMAIL"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
        })
    }

    /// Build the socket address for the server to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}

impl AssetHostConfig {
    /// Reads the `ASSET_HOST_*` variables. The remote host is only enabled when the
    /// cloud name, API key and API secret are all present.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let cloud_name = non_empty_var("ASSET_HOST_CLOUD_NAME")?;
        let api_key = non_empty_var("ASSET_HOST_API_KEY")?;
        let api_secret = non_empty_var("ASSET_HOST_API_SECRET")?;

        Some(Self {
            base_url: non_empty_var("ASSET_HOST_URL")
                .unwrap_or_else(|| "https://api.cloudinary.com".to_string()),
            cloud_name,
            api_key,
            api_secret,
            folder: non_empty_var("ASSET_HOST_FOLDER"),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

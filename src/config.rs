use anyhow::bail;

pub const DEFAULT_API_PREFIX: &str = "/api/v1/ims/users";

/// Which `UserStore` implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match var("USER_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => bail!("unknown USER_STORE `{other}` (expected postgres or memory)"),
        };

        let api_prefix = var("API_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.into());
        let api_prefix = api_prefix.trim_end_matches('/').to_string();
        if !api_prefix.starts_with('/') {
            bail!("API_PREFIX must start with `/` and name a path below the root");
        }

        Ok(Self {
            store,
            database_url: var("DATABASE_URL").filter(|v| !v.is_empty()),
            max_connections: var("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: var("APP_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            api_prefix,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Target database name. Also the replacement for the schema placeholder.
    pub database: Option<String>,
    /// Full connection URL. Takes precedence over the individual fields.
    pub url: Option<String>,
    pub connect_timeout: Duration,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = non_empty(lookup("DATABASE_URL"));
        let database = non_empty(lookup("DB_NAME"));

        let user = match (non_empty(lookup("DB_USER")), &url) {
            (Some(user), _) => user,
            (None, Some(_)) => String::new(),
            (None, None) => return Err(ConfigError::Missing { key: "DB_USER" }),
        };

        if url.is_none() && database.is_none() {
            return Err(ConfigError::Missing { key: "DB_NAME" });
        }

        let host = non_empty(lookup("DB_HOST")).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "DB_PORT", DEFAULT_MYSQL_PORT)?;
        let password = lookup("DB_PASS").unwrap_or_default();
        let connect_timeout_ms = parse_or(&lookup, "DB_CONNECT_TIMEOUT_MS", 5000u64)?;

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
            url,
            connect_timeout: Duration::from_millis(connect_timeout_ms),
        })
    }

    /// Builds the driver URL. An explicit `DATABASE_URL` wins; otherwise a
    /// MySQL URL is assembled from the individual settings.
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        format!(
            "mysql://{}:{}@{}:{}/{}?charset=utf8mb4",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            urlencoding::encode(self.database.as_deref().unwrap_or_default()),
        )
    }

    /// Connection target with credentials removed, safe for logs.
    pub fn redacted_target(&self) -> String {
        match &self.url {
            Some(url) => redact_url(url),
            None => format!(
                "mysql://{}@{}:{}/{}",
                self.user,
                self.host,
                self.port,
                self.database.as_deref().unwrap_or_default()
            ),
        }
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("url", &self.url.as_deref().map(redact_url))
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required env var: {key}")]
    Missing { key: &'static str },
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.rsplit_once('@') {
        Some((_, host)) => format!("{scheme}://***@{host}"),
        None => url.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match non_empty(lookup(key)) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

use postgres::config::Host;
use std::fmt;
use std::str::FromStr;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("{0} is not valid unicode")]
    NotUnicode(&'static str),

    #[error("{key} is not a valid connection string")]
    Invalid {
        key: &'static str,
        #[source]
        reason: postgres::Error,
    },
}

/// A validated connection string.
///
/// Formatting only ever shows `user@host:port/dbname`, never the password.
/// The raw string is not kept.
#[derive(Clone)]
pub struct DatabaseUrl {
    parsed: postgres::Config,
}

impl DatabaseUrl {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Self::parse_for(DATABASE_URL_VAR, raw)
    }

    fn parse_for(key: &'static str, raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Err(ConfigError::Empty(key));
        }
        let parsed = postgres::Config::from_str(raw)
            .map_err(|reason| ConfigError::Invalid { key, reason })?;

        Ok(DatabaseUrl { parsed })
    }

    pub(crate) fn pg_config(&self) -> &postgres::Config {
        &self.parsed
    }

    /// `host:port/dbname` of the first configured host.
    pub fn target(&self) -> String {
        let host = self
            .parsed
            .get_hosts()
            .first()
            .map(describe_host)
            .unwrap_or_else(|| "localhost".to_string());
        let port = self.parsed.get_ports().first().copied().unwrap_or(5432);

        match self.parsed.get_dbname() {
            Some(db) => format!("{}:{}/{}", host, port, db),
            None => format!("{}:{}", host, port),
        }
    }
}

fn describe_host(host: &Host) -> String {
    match host {
        Host::Tcp(name) => name.clone(),
        #[cfg(unix)]
        Host::Unix(path) => path.display().to_string(),
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parsed.get_user() {
            Some(user) => write!(f, "{}@{}", user, self.target()),
            None => write!(f, "{}", self.target()),
        }
    }
}

impl fmt::Debug for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseUrl")
            .field("target", &self.to_string())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: DatabaseUrl,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.into_string()))
    }

    /// Builds the config from an arbitrary variable lookup. `Some(Err(_))`
    /// means the variable exists but is not unicode.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<Result<String, std::ffi::OsString>>,
    {
        let raw = match lookup(DATABASE_URL_VAR) {
            None => return Err(ConfigError::Missing(DATABASE_URL_VAR)),
            Some(Err(_)) => return Err(ConfigError::NotUnicode(DATABASE_URL_VAR)),
            Some(Ok(raw)) => raw,
        };

        Ok(Config {
            database_url: DatabaseUrl::parse_for(DATABASE_URL_VAR, &raw)?,
        })
    }
}

use crate::config::ConfigError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Connection,
    Query,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Connection => write!(f, "connection"),
            ErrorKind::Query => write!(f, "query"),
        }
    }
}

/// Everything that can stop a report run.
///
/// Sources are boxed so fake clients in tests can produce them; the Postgres
/// client always boxes a `postgres::Error`.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("configuration error")]
    Configuration(#[from] ConfigError),

    #[error("failed to connect to {target}")]
    Connection {
        target: String,
        #[source]
        source: BoxError,
    },

    #[error("query failed: {statement}")]
    Query {
        statement: &'static str,
        #[source]
        source: BoxError,
    },
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::Configuration(_) => ErrorKind::Configuration,
            ReportError::Connection { .. } => ErrorKind::Connection,
            ReportError::Query { .. } => ErrorKind::Query,
        }
    }

    /// Renders the error followed by its source chain, one cause per line.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str("\n  caused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}

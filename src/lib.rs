pub mod config;
pub mod db;
pub mod error;
pub mod report;
pub mod value;

pub use crate::config::{Config, ConfigError, DatabaseUrl, DATABASE_URL_VAR};
pub use crate::db::{Db, PgConnector, PgCursor};
pub use crate::error::{BoxError, ErrorKind, ReportError};
pub use crate::report::{
    Connection, Connector, Cursor, Reporter, ResultSet, Row, STORAGE_MANAGER_QUERY,
};
pub use crate::value::Value;
pub use rust_decimal::Decimal;

/// Runs the report against the database named by `DATABASE_URL`.
pub fn run() -> Result<ResultSet, ReportError> {
    Reporter::new(PgConnector).run_from_env()
}

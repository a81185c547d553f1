use crate::config::{Config, DatabaseUrl};
use crate::error::{BoxError, ReportError};
use crate::value::Value;
use log::{debug, info, warn};

pub const STORAGE_MANAGER_QUERY: &str = "SELECT * FROM StorageManagerData;";

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }
}

/// All rows of a single query, fully materialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a value by column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }
}

pub trait Connector {
    type Connection: Connection;

    fn connect(&self, url: &DatabaseUrl) -> Result<Self::Connection, BoxError>;
}

pub trait Connection {
    type Cursor<'c>: Cursor
    where
        Self: 'c;

    fn cursor(&mut self) -> Result<Self::Cursor<'_>, BoxError>;

    fn close(self) -> Result<(), BoxError>;
}

pub trait Cursor {
    fn execute(&mut self, statement: &str) -> Result<(), BoxError>;

    fn fetch_all(&mut self) -> Result<ResultSet, BoxError>;

    fn close(self) -> Result<(), BoxError>;
}

/// Runs the storage manager query once against a database.
///
/// Every handle that was opened is closed before `run` returns, cursor first,
/// whether or not the query succeeded. Close failures are logged and do not
/// change the result.
pub struct Reporter<C> {
    connector: C,
}

impl<C: Connector> Reporter<C> {
    pub fn new(connector: C) -> Self {
        Reporter { connector }
    }

    /// Reads `DATABASE_URL` from the environment, then runs.
    pub fn run_from_env(&self) -> Result<ResultSet, ReportError> {
        let config = Config::from_env()?;
        self.run(&config.database_url)
    }

    pub fn run(&self, url: &DatabaseUrl) -> Result<ResultSet, ReportError> {
        debug!("Connecting to {}", url);
        let mut conn = self
            .connector
            .connect(url)
            .map_err(|source| ReportError::Connection {
                target: url.target(),
                source,
            })?;
        info!("Connected to {}", url.target());

        let result = fetch(&mut conn);

        match conn.close() {
            Ok(()) => debug!("Connection closed"),
            Err(e) => warn!("Failed to close connection: {}", e),
        }

        result
    }
}

fn fetch<Conn: Connection>(conn: &mut Conn) -> Result<ResultSet, ReportError> {
    let mut cursor = conn.cursor().map_err(query_error)?;
    debug!("Cursor opened");

    let result = cursor
        .execute(STORAGE_MANAGER_QUERY)
        .and_then(|()| cursor.fetch_all())
        .map_err(query_error);

    match cursor.close() {
        Ok(()) => debug!("Cursor closed"),
        Err(e) => warn!("Failed to close cursor: {}", e),
    }

    let rows = result?;
    info!("Fetched {} rows ({} columns)", rows.len(), rows.columns.len());
    Ok(rows)
}

fn query_error(source: BoxError) -> ReportError {
    ReportError::Query {
        statement: STORAGE_MANAGER_QUERY,
        source,
    }
}

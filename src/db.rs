use crate::config::DatabaseUrl;
use crate::error::BoxError;
use crate::report::{Connection, Connector, Cursor, ResultSet, Row};
use crate::value::Value;
use postgres::{Client, NoTls, Portal, Statement, Transaction};

/// Opens blocking `postgres` connections without TLS.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgConnector;

impl Connector for PgConnector {
    type Connection = Db;

    fn connect(&self, url: &DatabaseUrl) -> Result<Db, BoxError> {
        Ok(Db::new(url)?)
    }
}

pub struct Db {
    client: Client,
}

impl Db {
    pub fn new(url: &DatabaseUrl) -> Result<Self, postgres::Error> {
        let client = url.pg_config().connect(NoTls)?;

        Ok(Db { client })
    }
}

impl Connection for Db {
    type Cursor<'c> = PgCursor<'c> where Self: 'c;

    fn cursor(&mut self) -> Result<PgCursor<'_>, BoxError> {
        let tx = self.client.build_transaction().read_only(true).start()?;

        Ok(PgCursor { tx, bound: None })
    }

    fn close(self) -> Result<(), BoxError> {
        self.client.close()?;
        Ok(())
    }
}

/// A portal bound inside a read-only transaction.
///
/// Dropping it without `close` still rolls the transaction back.
pub struct PgCursor<'c> {
    tx: Transaction<'c>,
    bound: Option<(Statement, Portal)>,
}

impl Cursor for PgCursor<'_> {
    fn execute(&mut self, statement: &str) -> Result<(), BoxError> {
        let stmt = self.tx.prepare(statement)?;
        let portal = self.tx.bind(&stmt, &[])?;
        self.bound = Some((stmt, portal));
        Ok(())
    }

    fn fetch_all(&mut self) -> Result<ResultSet, BoxError> {
        let Some((stmt, portal)) = &self.bound else {
            return Err("fetch_all called before execute".into());
        };

        let columns = stmt
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        // max_rows of 0 drains the portal
        let rows = self
            .tx
            .query_portal(portal, 0)?
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResultSet { columns, rows })
    }

    fn close(self) -> Result<(), BoxError> {
        drop(self.bound);
        self.tx.rollback()?;
        Ok(())
    }
}

fn decode_row(row: &postgres::Row) -> Result<Row, postgres::Error> {
    let values = (0..row.len())
        .map(|idx| row.try_get::<_, Value>(idx))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Row::new(values))
}

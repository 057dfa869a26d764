//! SQLite schema and connection setup for the relational backend.
//!
//! Migrations are embedded at compile time and tracked through SQLite's
//! `user_version` pragma by `rusqlite_migration`.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::StoreResult;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// All schema migrations, applied in order.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(include_str!("migrations/001_initial_schema.sql"))])
}

/// Opens (or creates) the database at `path` and applies pending migrations.
pub fn open_database(path: &Path) -> StoreResult<Connection> {
    let mut conn = open_connection(path)?;
    migrations().to_latest(&mut conn)?;
    Ok(conn)
}

/// Opens a configured connection to an already migrated database.
pub fn open_connection(path: &Path) -> StoreResult<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> StoreResult<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    // Off by default in SQLite; the cascades depend on it.
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

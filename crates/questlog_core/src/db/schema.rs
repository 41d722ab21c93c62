//! Key/value schema bootstrap.
//!
//! The database holds a single `kv_store` table. `PRAGMA user_version`
//! records which layout a file was created with so that a newer file is
//! refused instead of being overwritten.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Layout version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const KV_STORE_SQL: &str = include_str!("kv_store.sql");

/// Creates the `kv_store` table when missing and stamps the schema version.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    let found = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(KV_STORE_SQL)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

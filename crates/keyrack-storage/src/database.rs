// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread: `Database` wraps one `tokio_rusqlite::Connection`, query
//! modules accept `&Database` and go through `connection().call()`, and
//! no additional write connections are ever created. This eliminates
//! SQLITE_BUSY errors under concurrent requests.

use keyrack_core::KeyrackError;
use tracing::debug;

/// Handle to the single SQLite connection.
///
/// Cheap to clone; all clones share the same background writer thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, run pending migrations,
    /// and apply connection pragmas (WAL, foreign keys, busy timeout).
    pub async fn open(path: &str) -> Result<Self, KeyrackError> {
        // Migrations run on a short-lived synchronous connection before
        // the async handle opens. Startup-only, so blocking is fine.
        {
            let mut conn = rusqlite::Connection::open(path).map_err(map_sql_err)?;
            crate::migrations::run_migrations(&mut conn)?;
        }

        let conn = tokio_rusqlite::Connection::open(path.to_owned())
            .await
            .map_err(map_sql_err)?;

        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            // Cascade deletes (users -> entries) depend on this.
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = %path, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying connection handle.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), KeyrackError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert tokio-rusqlite errors to `KeyrackError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> KeyrackError {
    KeyrackError::Storage {
        source: Box::new(e),
    }
}

/// Convert plain rusqlite errors to `KeyrackError::Storage`.
pub(crate) fn map_sql_err(e: rusqlite::Error) -> KeyrackError {
    KeyrackError::Storage {
        source: Box::new(e),
    }
}

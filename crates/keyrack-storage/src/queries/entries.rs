// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential entry CRUD, owner-scoped at the query boundary.
//!
//! Every operation takes the owner's user id and applies it in the WHERE
//! clause: reaching another user's entry by id produces `NotFound`, never
//! `Forbidden`, so existence is not leaked. The field encryption layer
//! wraps reads and writes here -- `username` is encrypted
//! deterministically (equality-searchable), `password` with a fresh nonce
//! per write.

use chrono::SecondsFormat;
use keyrack_core::{Entry, KeyrackError, NewEntry};
use keyrack_crypto::{EncryptedField, FieldCipher, FieldPolicy};
use rusqlite::params;
use tracing::debug;
use uuid::Uuid;

use crate::database::{map_tr_err, Database};

const ENTRY_COLUMNS: &str = "id, user_id, name, username_cipher, username_nonce, \
                             password_cipher, password_nonce, url, created_at, updated_at";

/// An entry row as stored, before decryption.
struct EntryRow {
    id: String,
    user_id: String,
    name: String,
    username_cipher: Vec<u8>,
    username_nonce: Vec<u8>,
    password_cipher: Vec<u8>,
    password_nonce: Vec<u8>,
    url: String,
    created_at: String,
    updated_at: String,
}

impl EntryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            username_cipher: row.get(3)?,
            username_nonce: row.get(4)?,
            password_cipher: row.get(5)?,
            password_nonce: row.get(6)?,
            url: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    /// Materialize the decrypted entry. Any decryption failure aborts the
    /// containing operation -- no partial data is returned.
    fn decrypt(self, cipher: &FieldCipher) -> Result<Entry, KeyrackError> {
        let username = cipher.decrypt(
            FieldPolicy::Deterministic,
            &stored_field(self.username_cipher, self.username_nonce)?,
        )?;
        let password = cipher.decrypt(
            FieldPolicy::Randomized,
            &stored_field(self.password_cipher, self.password_nonce)?,
        )?;

        Ok(Entry {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            username,
            password,
            url: self.url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Rebuild an [`EncryptedField`] from its stored columns.
fn stored_field(ciphertext: Vec<u8>, nonce: Vec<u8>) -> Result<EncryptedField, KeyrackError> {
    let nonce: [u8; 12] = nonce
        .try_into()
        .map_err(|_| KeyrackError::Crypto("corrupted nonce (expected 12 bytes)".to_string()))?;
    Ok(EncryptedField { ciphertext, nonce })
}

/// Current time as an RFC 3339 string with millisecond precision.
pub(crate) fn now_utc() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Create an entry owned by `user_id`.
pub async fn create_entry(
    db: &Database,
    cipher: &FieldCipher,
    user_id: &str,
    new: &NewEntry,
) -> Result<Entry, KeyrackError> {
    new.validate().map_err(KeyrackError::Validation)?;

    let username = cipher.encrypt(FieldPolicy::Deterministic, &new.username)?;
    let password = cipher.encrypt(FieldPolicy::Randomized, &new.password)?;

    let now = now_utc();
    let entry = Entry {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name: new.name.clone(),
        username: new.username.clone(),
        password: new.password.clone(),
        url: new.url.clone(),
        created_at: now.clone(),
        updated_at: now,
    };

    let insert = entry.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO entries (id, user_id, name, username_cipher, username_nonce,
                 password_cipher, password_nonce, url, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    insert.id,
                    insert.user_id,
                    insert.name,
                    username.ciphertext,
                    username.nonce.to_vec(),
                    password.ciphertext,
                    password.nonce.to_vec(),
                    insert.url,
                    insert.created_at,
                    insert.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

    debug!(entry_id = %entry.id, "entry created");
    Ok(entry)
}

/// List a user's entries ordered by name ascending, optionally filtered
/// by a case-insensitive substring match on the name.
///
/// A `None` or blank filter returns ALL of the user's entries -- blank is
/// equivalent to no filter, not "match nothing". This mirrors the search
/// box semantics: clearing it shows everything.
pub async fn list_entries(
    db: &Database,
    cipher: &FieldCipher,
    user_id: &str,
    name_filter: Option<&str>,
) -> Result<Vec<Entry>, KeyrackError> {
    let user_id = user_id.to_string();
    let filter = name_filter
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    let rows = db
        .connection()
        .call(move |conn| -> Result<Vec<EntryRow>, rusqlite::Error> {
            let mut rows = Vec::new();
            match &filter {
                Some(name) => {
                    // SQLite LIKE is case-insensitive for ASCII.
                    let pattern = format!("%{name}%");
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {ENTRY_COLUMNS} FROM entries
                         WHERE user_id = ?1 AND name LIKE ?2 ORDER BY name ASC"
                    ))?;
                    let mapped = stmt.query_map(params![user_id, pattern], |row| {
                        EntryRow::from_row(row)
                    })?;
                    for row in mapped {
                        rows.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {ENTRY_COLUMNS} FROM entries
                         WHERE user_id = ?1 ORDER BY name ASC"
                    ))?;
                    let mapped =
                        stmt.query_map(params![user_id], |row| EntryRow::from_row(row))?;
                    for row in mapped {
                        rows.push(row?);
                    }
                }
            }
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)?;

    rows.into_iter().map(|row| row.decrypt(cipher)).collect()
}

/// Fetch a single entry by id, scoped to its owner.
pub async fn get_entry(
    db: &Database,
    cipher: &FieldCipher,
    user_id: &str,
    entry_id: &str,
) -> Result<Entry, KeyrackError> {
    let user_id = user_id.to_string();
    let entry_id = entry_id.to_string();

    let row = db
        .connection()
        .call(move |conn| -> Result<Option<EntryRow>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1 AND user_id = ?2"
            ))?;
            let result = stmt.query_row(params![entry_id, user_id], |row| {
                EntryRow::from_row(row)
            });
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    row.ok_or(KeyrackError::NotFound)?.decrypt(cipher)
}

/// Update an entry's fields, scoped to its owner. Ownership itself is
/// immutable: `user_id` is matched, never set.
pub async fn update_entry(
    db: &Database,
    cipher: &FieldCipher,
    user_id: &str,
    entry_id: &str,
    new: &NewEntry,
) -> Result<Entry, KeyrackError> {
    new.validate().map_err(KeyrackError::Validation)?;

    let username = cipher.encrypt(FieldPolicy::Deterministic, &new.username)?;
    let password = cipher.encrypt(FieldPolicy::Randomized, &new.password)?;

    let updated_at = now_utc();
    let owner = user_id.to_string();
    let id = entry_id.to_string();
    let fields = new.clone();
    let stamp = updated_at.clone();

    let created_at = db
        .connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE entries SET name = ?1, username_cipher = ?2, username_nonce = ?3,
                 password_cipher = ?4, password_nonce = ?5, url = ?6, updated_at = ?7
                 WHERE id = ?8 AND user_id = ?9",
                params![
                    fields.name,
                    username.ciphertext,
                    username.nonce.to_vec(),
                    password.ciphertext,
                    password.nonce.to_vec(),
                    fields.url,
                    stamp,
                    id,
                    owner,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            let created_at: String = conn.query_row(
                "SELECT created_at FROM entries WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            Ok(Some(created_at))
        })
        .await
        .map_err(map_tr_err)?;

    let created_at = created_at.ok_or(KeyrackError::NotFound)?;

    Ok(Entry {
        id: entry_id.to_string(),
        user_id: user_id.to_string(),
        name: new.name.clone(),
        username: new.username.clone(),
        password: new.password.clone(),
        url: new.url.clone(),
        created_at,
        updated_at,
    })
}

/// Delete an entry, scoped to its owner.
pub async fn delete_entry(
    db: &Database,
    user_id: &str,
    entry_id: &str,
) -> Result<(), KeyrackError> {
    let user_id = user_id.to_string();
    let id = entry_id.to_string();

    let deleted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "DELETE FROM entries WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if deleted == 0 {
        return Err(KeyrackError::NotFound);
    }
    Ok(())
}

/// Find a user's entries by exact username, via deterministic ciphertext
/// equality -- no row is decrypted to answer the lookup.
pub async fn find_entries_by_username(
    db: &Database,
    cipher: &FieldCipher,
    user_id: &str,
    username: &str,
) -> Result<Vec<Entry>, KeyrackError> {
    let needle = cipher.encrypt(FieldPolicy::Deterministic, username)?;
    let user_id = user_id.to_string();

    let rows = db
        .connection()
        .call(move |conn| -> Result<Vec<EntryRow>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries
                 WHERE user_id = ?1 AND username_cipher = ?2 ORDER BY name ASC"
            ))?;
            let mapped = stmt.query_map(params![user_id, needle.ciphertext], |row| {
                EntryRow::from_row(row)
            })?;
            let mut rows = Vec::new();
            for row in mapped {
                rows.push(row?);
            }
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)?;

    rows.into_iter().map(|row| row.decrypt(cipher)).collect()
}

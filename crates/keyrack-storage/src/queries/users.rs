// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User account CRUD and credential verification.

use keyrack_core::{KeyrackError, ValidationErrors};
use keyrack_crypto::password;
use rusqlite::params;
use tracing::debug;
use uuid::Uuid;

use crate::database::{map_tr_err, Database};
use crate::models::{NewUser, User};

/// Register a new account.
///
/// The password is hashed with Argon2id before it reaches the database;
/// a duplicate email (case-insensitive) is a validation error, not a
/// storage error.
pub async fn create_user(db: &Database, new: &NewUser) -> Result<User, KeyrackError> {
    new.validate().map_err(KeyrackError::Validation)?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: new.email.trim().to_string(),
        password_hash: password::hash_password(&new.password)?,
        created_at: crate::queries::entries::now_utc(),
    };

    let insert = user.clone();
    let inserted = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            // The email column is COLLATE NOCASE, so this existence check
            // and the UNIQUE constraint are both case-insensitive.
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
                params![insert.email],
                |row| row.get(0),
            )?;
            if exists {
                return Ok(false);
            }
            conn.execute(
                "INSERT INTO users (id, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    insert.id,
                    insert.email,
                    insert.password_hash,
                    insert.created_at,
                ],
            )?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)?;

    if !inserted {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Email has already been taken");
        return Err(KeyrackError::Validation(errors));
    }

    debug!(user_id = %user.id, "user created");
    Ok(user)
}

/// Verify an email/password pair.
///
/// Returns `None` for an unknown email AND for a password mismatch --
/// the caller surfaces one generic message for both, so nothing here may
/// distinguish them.
pub async fn authenticate(
    db: &Database,
    email: &str,
    password_input: &str,
) -> Result<Option<User>, KeyrackError> {
    let Some(user) = find_by_email(db, email).await? else {
        return Ok(None);
    };
    if password::verify_password(password_input, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Look up a user by email (case-insensitive).
pub async fn find_by_email(db: &Database, email: &str) -> Result<Option<User>, KeyrackError> {
    let email = email.trim().to_string();
    db.connection()
        .call(move |conn| -> Result<Option<User>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, email, password_hash, created_at FROM users WHERE email = ?1",
            )?;
            let result = stmt.query_row(params![email], |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                    created_at: row.get(3)?,
                })
            });
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a user by id.
pub async fn find_by_id(db: &Database, id: &str) -> Result<Option<User>, KeyrackError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<User>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, email, password_hash, created_at FROM users WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                    created_at: row.get(3)?,
                })
            });
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Delete an account. The schema's ON DELETE CASCADE removes every entry
/// the user owns; no orphaned entries survive.
pub async fn delete_user(db: &Database, id: &str) -> Result<(), KeyrackError> {
    let id_owned = id.to_string();
    let deleted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM users WHERE id = ?1", params![id_owned])
        })
        .await
        .map_err(map_tr_err)?;

    if deleted == 0 {
        return Err(KeyrackError::NotFound);
    }
    debug!(user_id = %id, "user deleted");
    Ok(())
}

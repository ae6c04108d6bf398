//! SQLite-backed credential repository
//!
//! One row per user, overwritten on every authorization and refresh.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use intentrelay_core::CredentialRepository;
use intentrelay_domain::{IntentRelayError, Result, UserCredential};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;

use super::manager::{map_sql_error, DbManager};
use crate::errors::InfraError;

/// `CredentialRepository` over the `user_credentials` table
pub struct SqliteCredentialRepository {
    db: Arc<DbManager>,
}

impl SqliteCredentialRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialRepository for SqliteCredentialRepository {
    async fn get(&self, user_id: &str) -> Result<Option<UserCredential>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<Option<UserCredential>> {
            let conn = db.get_connection()?;

            conn.query_row(
                "SELECT access_token, refresh_token, expiry_epoch_millis
                 FROM user_credentials WHERE user_id = ?1",
                params![&user_id],
                map_credential_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn put(&self, user_id: &str, credential: &UserCredential) -> Result<()> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let credential = credential.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;

            conn.execute(
                "INSERT INTO user_credentials
                    (user_id, access_token, refresh_token, expiry_epoch_millis, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                    access_token = excluded.access_token,
                    refresh_token = excluded.refresh_token,
                    expiry_epoch_millis = excluded.expiry_epoch_millis,
                    updated_at = excluded.updated_at",
                params![
                    &user_id,
                    &credential.access_token,
                    &credential.refresh_token,
                    credential.expiry_epoch_millis,
                    Utc::now().timestamp_millis(),
                ],
            )
            .map_err(map_sql_error)?;

            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_credential_row(row: &Row<'_>) -> rusqlite::Result<UserCredential> {
    Ok(UserCredential {
        access_token: row.get(0)?,
        refresh_token: row.get(1)?,
        expiry_epoch_millis: row.get(2)?,
    })
}

fn map_join_error(err: task::JoinError) -> IntentRelayError {
    IntentRelayError::from(InfraError::from(err))
}

//! Durable credential slots
//!
//! A slot holds at most one value. Every read checks the expiry first, so an
//! expired value is indistinguishable from an absent one; the row is purged on
//! that read.

use chrono::{DateTime, Duration, Utc};
use rusqlite::OptionalExtension;

use crate::database::Database;
use crate::Result;

/// Slot holding the API bearer token
pub const TOKEN_SLOT: &str = "token";

/// Lifetime applied by [`Database::store_credential`]
pub const CREDENTIAL_TTL_DAYS: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub slot: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredCredential {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl Database {
    /// Store a credential with the default one-day lifetime, replacing any
    /// previous value in the slot.
    pub fn store_credential(&self, slot: &str, value: &str) -> Result<StoredCredential> {
        let expires_at = Utc::now() + Duration::days(CREDENTIAL_TTL_DAYS);
        self.store_credential_until(slot, value, expires_at)
    }

    pub fn store_credential_until(
        &self,
        slot: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<StoredCredential> {
        let updated_at = Utc::now();

        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO credentials (slot, value, expires_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    slot,
                    value,
                    expires_at.to_rfc3339(),
                    updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;

        tracing::debug!(slot = %slot, expires_at = %expires_at, "Stored credential");

        Ok(StoredCredential {
            slot: slot.to_string(),
            value: value.to_string(),
            expires_at,
            updated_at,
        })
    }

    /// Read the live credential in a slot. Expired or unreadable rows are
    /// removed and reported as absent.
    pub fn load_credential(&self, slot: &str) -> Result<Option<StoredCredential>> {
        let row = self.with_connection(|conn| {
            let row = conn
                .query_row(
                    "SELECT value, expires_at, updated_at FROM credentials WHERE slot = ?1",
                    [slot],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )
                .optional()?;
            Ok(row)
        })?;

        let Some((value, expires_str, updated_str)) = row else {
            return Ok(None);
        };

        let expires_at = match DateTime::parse_from_rfc3339(&expires_str) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(_) => {
                tracing::warn!(slot = %slot, "Discarding credential with unreadable expiry");
                self.remove_credential(slot)?;
                return Ok(None);
            }
        };
        let updated_at = DateTime::parse_from_rfc3339(&updated_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(expires_at);

        let credential = StoredCredential {
            slot: slot.to_string(),
            value,
            expires_at,
            updated_at,
        };

        if credential.is_expired_at(Utc::now()) {
            tracing::debug!(slot = %slot, "Credential expired");
            self.remove_credential(slot)?;
            return Ok(None);
        }

        Ok(Some(credential))
    }

    pub fn credential(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.load_credential(slot)?.map(|c| c.value))
    }

    /// Clear a slot. Returns whether a row was removed.
    pub fn remove_credential(&self, slot: &str) -> Result<bool> {
        let removed = self.with_connection(|conn| {
            let n = conn.execute("DELETE FROM credentials WHERE slot = ?1", [slot])?;
            Ok(n > 0)
        })?;
        Ok(removed)
    }
}

//! Named key-value buckets over SQLite.
//!
//! # Responsibility
//! - Store opaque byte values under byte keys inside one named collection.
//! - Iterate entries in unsigned lexicographic key order.
//! - Hand out a persistent, monotonic per-bucket sequence.
//!
//! # Invariants
//! - A bucket never interprets keys or values.
//! - `next_sequence` never returns the same value twice for one bucket.
//! - Callers own transaction scope: every method runs on the connection (or
//!   transaction) the bucket was bound to.

use super::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Handle to one named bucket bound to a connection or open transaction.
#[derive(Clone, Copy)]
pub struct Bucket<'conn> {
    conn: &'conn Connection,
    name: &'static str,
}

impl<'conn> Bucket<'conn> {
    /// Binds to an existing bucket.
    ///
    /// # Errors
    /// - Returns `DbError::BucketNotFound` when `name` was never created.
    pub fn open(conn: &'conn Connection, name: &'static str) -> DbResult<Self> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM buckets WHERE name = ?1);",
            [name],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(DbError::BucketNotFound(name));
        }
        Ok(Self { conn, name })
    }

    /// Creates the bucket with a zero sequence if absent, then binds to it.
    pub fn create_if_missing(conn: &'conn Connection, name: &'static str) -> DbResult<Self> {
        conn.execute(
            "INSERT OR IGNORE INTO buckets (name, sequence) VALUES (?1, 0);",
            [name],
        )?;
        Ok(Self { conn, name })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &[u8]) -> DbResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM entries WHERE bucket = ?1 AND key = ?2;",
                params![self.name, key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Returns whether `key` is present.
    pub fn contains(&self, key: &[u8]) -> DbResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM entries WHERE bucket = ?1 AND key = ?2);",
            params![self.name, key],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Inserts or overwrites the value under `key`.
    pub fn put(&self, key: &[u8], value: &[u8]) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO entries (bucket, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (bucket, key) DO UPDATE SET value = excluded.value;",
            params![self.name, key, value],
        )?;
        Ok(())
    }

    /// Removes `key`. Returns `false` when nothing was stored there.
    pub fn delete(&self, key: &[u8]) -> DbResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM entries WHERE bucket = ?1 AND key = ?2;",
            params![self.name, key],
        )?;
        Ok(changed > 0)
    }

    /// Returns every `(key, value)` pair in ascending key order.
    pub fn entries(&self) -> DbResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM entries WHERE bucket = ?1 ORDER BY key ASC;")?;
        let rows = stmt.query_map([self.name], |row| {
            Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Returns the current sequence value without advancing it.
    pub fn sequence(&self) -> DbResult<u64> {
        let value = self
            .conn
            .query_row(
                "SELECT sequence FROM buckets WHERE name = ?1;",
                [self.name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .ok_or(DbError::BucketNotFound(self.name))?;
        Ok(sequence_to_u64(value))
    }

    /// Advances the persistent sequence and returns the new value.
    ///
    /// The first call on a fresh bucket returns 1. The increment becomes
    /// durable only when the enclosing transaction commits.
    ///
    /// # Errors
    /// - `DbError::BucketNotFound` when the bucket row is missing.
    /// - `DbError::SequenceExhausted` once the counter reaches `i64::MAX`.
    pub fn next_sequence(&self) -> DbResult<u64> {
        let advanced = self
            .conn
            .query_row(
                "UPDATE buckets
                 SET sequence = sequence + 1
                 WHERE name = ?1 AND sequence < ?2
                 RETURNING sequence;",
                params![self.name, i64::MAX],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        match advanced {
            Some(value) => Ok(sequence_to_u64(value)),
            None => {
                // Either the bucket is gone or the guard rejected the bump.
                self.sequence()?;
                Err(DbError::SequenceExhausted(self.name))
            }
        }
    }
}

fn sequence_to_u64(value: i64) -> u64 {
    // The schema CHECK keeps sequences non-negative.
    value.max(0) as u64
}

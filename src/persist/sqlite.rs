//! SQLite-backed repository storing JSON payloads per entity kind.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use super::{PersistResult, Record, Repository, ScoringWrite, Store};
use crate::{
    round::{DifferentialRecord, HoleCard, Round},
    types::RoundId,
};

/// SQLite implementation of [`Repository`] for every [`Record`] kind.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens or creates a database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening sqlite repository");
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory database.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }
}

fn upsert<T: Record>(conn: &Connection, record: &T) -> PersistResult<()> {
    let table = T::KIND.table();
    let key = record.key();
    let payload = serde_json::to_vec(record)?;

    conn.execute(
        &format!(
            "INSERT INTO {table}(id, payload) VALUES (?1, ?2) \
             ON CONFLICT(id) DO UPDATE SET payload = excluded.payload"
        ),
        params![key as i64, payload],
    )?;
    conn.execute(
        "INSERT INTO key_sequences(kind, next_key) VALUES (?1, ?2) \
         ON CONFLICT(kind) DO UPDATE SET next_key = MAX(next_key, excluded.next_key)",
        params![table, key.saturating_add(1) as i64],
    )?;
    Ok(())
}

fn delete_row<T: Record>(conn: &Connection, key: u64) -> PersistResult<bool> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", T::KIND.table());
    let count = conn.execute(&sql, params![key as i64])?;
    Ok(count > 0)
}

impl<T: Record> Repository<T> for SqliteRepository {
    fn get(&self, key: u64) -> PersistResult<Option<T>> {
        let sql = format!("SELECT payload FROM {} WHERE id = ?1", T::KIND.table());
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(&sql, params![key as i64], |row| row.get(0))
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&payload)?))
    }

    fn list(&self) -> PersistResult<Vec<T>> {
        let sql = format!("SELECT payload FROM {} ORDER BY id ASC", T::KIND.table());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, Vec<u8>>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(serde_json::from_slice(&row?)?);
        }
        Ok(out)
    }

    fn save(&mut self, record: T) -> PersistResult<()> {
        let tx = self.conn.transaction()?;
        upsert(&tx, &record)?;
        tx.commit()?;

        debug!(table = T::KIND.table(), key = record.key(), "saved record");
        Ok(())
    }

    fn delete(&mut self, key: u64) -> PersistResult<bool> {
        delete_row::<T>(&self.conn, key)
    }

    fn next_key(&mut self) -> PersistResult<u64> {
        let table = T::KIND.table();
        let tx = self.conn.transaction()?;
        let next: Option<i64> = tx
            .query_row(
                "SELECT next_key FROM key_sequences WHERE kind = ?1",
                params![table],
                |row| row.get(0),
            )
            .optional()?;
        let key = next.unwrap_or(1);
        tx.execute(
            "INSERT INTO key_sequences(kind, next_key) VALUES (?1, ?2) \
             ON CONFLICT(kind) DO UPDATE SET next_key = excluded.next_key",
            params![table, key + 1],
        )?;
        tx.commit()?;
        Ok(key as u64)
    }
}

impl Store for SqliteRepository {
    fn commit_scoring(&mut self, write: ScoringWrite) -> PersistResult<()> {
        let round_id = write.round_id();
        let tx = self.conn.transaction()?;
        if let Some(round) = &write.round {
            upsert(&tx, round)?;
        }
        upsert(&tx, &write.card)?;
        match &write.differential {
            Some(record) => upsert(&tx, record)?,
            None => {
                delete_row::<DifferentialRecord>(&tx, round_id)?;
            }
        }
        tx.commit()?;

        debug!(round_id, "committed scoring");
        Ok(())
    }

    fn purge_round(&mut self, round_id: RoundId) -> PersistResult<bool> {
        let tx = self.conn.transaction()?;
        let removed = delete_row::<Round>(&tx, round_id)?;
        delete_row::<HoleCard>(&tx, round_id)?;
        delete_row::<DifferentialRecord>(&tx, round_id)?;
        tx.commit()?;
        Ok(removed)
    }
}

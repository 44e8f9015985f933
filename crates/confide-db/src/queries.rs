use crate::Database;
use crate::models::ConfessionRow;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Confessions --

    pub fn insert_confession(&self, row: &ConfessionRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO confessions (id, message, status, sentiment, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![row.id, row.message, row.status, row.sentiment, row.created_at],
            )?;
            Ok(())
        })
    }

    /// Newest first, at most `limit` rows.
    pub fn list_confessions(&self, status: &str, limit: u32) -> Result<Vec<ConfessionRow>> {
        self.with_conn(|conn| query_confessions(conn, status, limit))
    }

    pub fn count_confessions(&self, status: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM confessions WHERE status = ?1",
                [status],
                |r| r.get(0),
            )?;
            Ok(count as u64)
        })
    }
}

fn query_confessions(conn: &Connection, status: &str, limit: u32) -> Result<Vec<ConfessionRow>> {
    // rowid breaks ties between confessions created in the same millisecond
    let mut stmt = conn.prepare(
        "SELECT id, message, status, sentiment, created_at
         FROM confessions
         WHERE status = ?1
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![status, limit], |row| {
            Ok(ConfessionRow {
                id: row.get(0)?,
                message: row.get(1)?,
                status: row.get(2)?,
                sentiment: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

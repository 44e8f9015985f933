use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (confessions)");
        conn.execute_batch(
            "
            CREATE TABLE confessions (
                id          TEXT PRIMARY KEY,
                message     TEXT NOT NULL CHECK (length(message) BETWEEN 1 AND 500),
                status      TEXT NOT NULL DEFAULT 'approved',
                sentiment   TEXT NOT NULL DEFAULT 'UNKNOWN',
                created_at  TEXT NOT NULL
            );

            CREATE INDEX idx_confessions_status_created
                ON confessions(status, created_at);

            -- Confessions are append-only
            CREATE TRIGGER confessions_no_update
                BEFORE UPDATE ON confessions
                BEGIN SELECT RAISE(ABORT, 'confessions are immutable'); END;

            CREATE TRIGGER confessions_no_delete
                BEFORE DELETE ON confessions
                BEGIN SELECT RAISE(ABORT, 'confessions are immutable'); END;

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }
}

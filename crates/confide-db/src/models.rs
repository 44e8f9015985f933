/// Database row types. These map directly to SQLite rows.
/// Distinct from confide-types models to keep the DB layer independent.

pub struct ConfessionRow {
    pub id: String,
    pub message: String,
    pub status: String,
    pub sentiment: String,
    /// RFC 3339, UTC, millisecond precision; sorts lexically.
    pub created_at: String,
}

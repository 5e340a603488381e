use burrow_sql::SQLStore;

use crate::service::SocialError;

/// Initialize the SQLite schema for all social resources.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), SocialError> {
    let statements = [
        // Accounts table: identity + visibility mode
        "CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            handle TEXT,
            visibility TEXT NOT NULL DEFAULT 'public',
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_handle
            ON accounts(handle) WHERE handle IS NOT NULL",
        "CREATE INDEX IF NOT EXISTS idx_accounts_name ON accounts(name)",

        // Relationships table: directed edges. The (from, to, kind) triple
        // is the natural key; `id` stays stable across request→follow
        // promotion.
        "CREATE TABLE IF NOT EXISTS relationships (
            id TEXT PRIMARY KEY,
            from_id TEXT NOT NULL,
            to_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (from_id, to_id, kind),
            FOREIGN KEY (from_id) REFERENCES accounts(id) ON DELETE CASCADE,
            FOREIGN KEY (to_id) REFERENCES accounts(id) ON DELETE CASCADE
        )",
        "CREATE INDEX IF NOT EXISTS idx_relationships_from ON relationships(from_id, kind)",
        "CREATE INDEX IF NOT EXISTS idx_relationships_to ON relationships(to_id, kind)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| SocialError::Storage(e.to_string()))?;
    }

    Ok(())
}

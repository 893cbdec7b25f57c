use rusqlite::Connection;

/// 创建路由表
///
/// `key` 不唯一：同一个键存在多条记录时按写入顺序取第一条。
pub fn create_tables(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS routes (
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );
        CREATE INDEX IF NOT EXISTS idx_routes_key ON routes(key);",
    )?;
    Ok(())
}

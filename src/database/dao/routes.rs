use crate::models::route::Route;
use rusqlite::{params, Connection, OptionalExtension};

pub struct RouteDao;

impl RouteDao {
    /// 获取键对应的原始 JSON 值，多条记录时取第一条
    pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>, rusqlite::Error> {
        conn.query_row(
            "SELECT value FROM routes WHERE key = ?1 ORDER BY rowid LIMIT 1",
            [key],
            |row| row.get(0),
        )
        .optional()
    }

    /// 写入路由，替换该键已有的全部记录
    #[cfg(test)]
    pub fn upsert(conn: &Connection, key: &str, route: &Route) -> Result<(), rusqlite::Error> {
        let value = serde_json::to_string(route)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Self::insert_raw_replacing(conn, key, &value)
    }

    /// 写入原始值，替换该键已有的全部记录
    #[cfg(test)]
    pub fn insert_raw_replacing(
        conn: &Connection,
        key: &str,
        value: &str,
    ) -> Result<(), rusqlite::Error> {
        conn.execute("DELETE FROM routes WHERE key = ?1", [key])?;
        Self::insert_raw(conn, key, value)
    }

    /// 追加一条原始记录
    #[cfg(test)]
    pub fn insert_raw(conn: &Connection, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        conn.execute(
            "INSERT INTO routes (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// 删除键的全部记录，返回删除条数
    #[cfg(test)]
    pub fn delete(conn: &Connection, key: &str) -> Result<usize, rusqlite::Error> {
        conn.execute("DELETE FROM routes WHERE key = ?1", [key])
    }

    /// 列出所有键（去重，按字母序）
    pub fn list_keys(conn: &Connection) -> Result<Vec<String>, rusqlite::Error> {
        let mut stmt = conn.prepare("SELECT DISTINCT key FROM routes ORDER BY key")?;
        let keys = stmt.query_map([], |row| row.get(0))?;
        keys.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::create_tables;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_get_missing_key() {
        let conn = conn();
        assert_eq!(RouteDao::get_value(&conn, "v1/none").unwrap(), None);
    }

    #[test]
    fn test_upsert_and_get() {
        let conn = conn();
        let route = Route::rest("https://backend.example/a").with_token("T1");
        RouteDao::upsert(&conn, "v1/a", &route).unwrap();

        let raw = RouteDao::get_value(&conn, "v1/a").unwrap().unwrap();
        let parsed: Route = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, route);

        let replacement = Route::ably("events");
        RouteDao::upsert(&conn, "v1/a", &replacement).unwrap();
        let raw = RouteDao::get_value(&conn, "v1/a").unwrap().unwrap();
        assert_eq!(serde_json::from_str::<Route>(&raw).unwrap(), replacement);
    }

    #[test]
    fn test_first_record_wins() {
        let conn = conn();
        RouteDao::insert_raw(&conn, "v1/dup", r#"{"type":"REST","targetUrl":"first"}"#).unwrap();
        RouteDao::insert_raw(&conn, "v1/dup", r#"{"type":"REST","targetUrl":"second"}"#).unwrap();

        let raw = RouteDao::get_value(&conn, "v1/dup").unwrap().unwrap();
        assert!(raw.contains("first"));
    }

    #[test]
    fn test_delete_and_list() {
        let conn = conn();
        RouteDao::insert_raw(&conn, "v2/b", "{}").unwrap();
        RouteDao::insert_raw(&conn, "v1/a", "{}").unwrap();
        RouteDao::insert_raw(&conn, "v1/a", "{}").unwrap();

        assert_eq!(RouteDao::list_keys(&conn).unwrap(), vec!["v1/a", "v2/b"]);
        assert_eq!(RouteDao::delete(&conn, "v1/a").unwrap(), 2);
        assert_eq!(RouteDao::list_keys(&conn).unwrap(), vec!["v2/b"]);
    }
}

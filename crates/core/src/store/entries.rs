//! Entry CRUD operations.
//!
//! Provides partitioned get/put/has lookups plus the reclamation and
//! maintenance queries used by the lifecycle controller. A miss is a
//! first-class `None`, never an error.

use super::connection::CacheStore;
use super::identity::RequestIdentity;
use crate::response::{Headers, ResponseSnapshot};
use crate::Error;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

const ENTRY_COLUMNS: &str = "status, headers_json, body";

fn row_to_snapshot(row: &rusqlite::Row<'_>) -> Result<ResponseSnapshot, Error> {
    let status: u16 = row.get::<_, i64>(0).map_err(Error::from)? as u16;
    let headers_json: String = row.get(1).map_err(Error::from)?;
    let body: Vec<u8> = row.get(2).map_err(Error::from)?;
    let headers: Headers =
        serde_json::from_str(&headers_json).map_err(|e| Error::InvalidHeaders(e.to_string()))?;
    Ok(ResponseSnapshot::new(status, headers, body))
}

impl CacheStore {
    /// Write an entry, overwriting any prior entry for the same identity in
    /// the same partition. The partition is created lazily on first write.
    ///
    /// Consumes the snapshot's body; callers keeping a copy for the
    /// requester must duplicate before calling.
    pub async fn put(
        &self, partition: &str, identity: &RequestIdentity, snapshot: ResponseSnapshot,
    ) -> Result<(), Error> {
        let key = identity.key();
        let partition = partition.to_string();
        let identity = identity.clone();
        let status = snapshot.status() as i64;
        let headers_json = serde_json::to_string(snapshot.headers())
            .map_err(|e| Error::InvalidHeaders(e.to_string()))?;
        let body = snapshot.read_body()?.to_vec();
        let stored_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (
                    partition_name, identity, method, url, vary,
                    status, headers_json, body, stored_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(partition_name, identity) DO UPDATE SET
                    method = excluded.method,
                    url = excluded.url,
                    vary = excluded.vary,
                    status = excluded.status,
                    headers_json = excluded.headers_json,
                    body = excluded.body,
                    stored_at = excluded.stored_at",
                    params![
                        partition,
                        key,
                        &identity.method,
                        &identity.url,
                        &identity.vary,
                        status,
                        headers_json,
                        body,
                        stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up an entry in one partition. Returns `None` on miss.
    pub async fn get(
        &self, partition: &str, identity: &RequestIdentity,
    ) -> Result<Option<ResponseSnapshot>, Error> {
        let key = identity.key();
        let partition = partition.to_string();
        self.conn
            .call(move |conn| -> Result<Option<ResponseSnapshot>, Error> {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM entries WHERE partition_name = ?1 AND identity = ?2"
                ))?;
                let result = stmt.query_row(params![partition, key], |row| {
                    Ok(row_to_snapshot(row))
                });
                match result {
                    Ok(snapshot) => snapshot.map(Some),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Look up an entry across all partitions, unspecified order; the first
    /// match wins. Returns `None` on miss.
    pub async fn match_any(&self, identity: &RequestIdentity) -> Result<Option<ResponseSnapshot>, Error> {
        let key = identity.key();
        self.conn
            .call(move |conn| -> Result<Option<ResponseSnapshot>, Error> {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM entries WHERE identity = ?1 LIMIT 1"
                ))?;
                let result = stmt.query_row(params![key], |row| Ok(row_to_snapshot(row)));
                match result {
                    Ok(snapshot) => snapshot.map(Some),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Whether an entry exists in the given partition. Used to make
    /// precaching idempotent.
    pub async fn has(&self, partition: &str, identity: &RequestIdentity) -> Result<bool, Error> {
        let key = identity.key();
        let partition = partition.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn
                    .query_row(
                        "SELECT EXISTS(
                        SELECT 1 FROM entries WHERE partition_name = ?1 AND identity = ?2
                    )",
                        params![partition, key],
                        |row| row.get(0),
                    )
                    .map_err(Error::from)?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    /// Distinct partition names currently present in the store.
    pub async fn partitions(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt =
                    conn.prepare("SELECT DISTINCT partition_name FROM entries ORDER BY partition_name")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry whose partition is not in `keep`.
    ///
    /// Used on activation of a new agent version to reclaim partitions the
    /// new version no longer references. Returns the number of deleted
    /// entries.
    pub async fn retain_partitions(&self, keep: &[&str]) -> Result<u64, Error> {
        let keep: Vec<String> = keep.iter().map(|s| s.to_string()).collect();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let placeholders = (1..=keep.len())
                    .map(|i| format!("?{i}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = if keep.is_empty() {
                    "DELETE FROM entries".to_string()
                } else {
                    format!("DELETE FROM entries WHERE partition_name NOT IN ({placeholders})")
                };
                let deleted = conn.execute(&sql, rusqlite::params_from_iter(keep.iter()))?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete entries stored before the cutoff. Maintenance helper, not part
    /// of any strategy path. Returns the number of deleted entries.
    pub async fn purge_older_than(&self, cutoff: chrono::DateTime<chrono::Utc>) -> Result<u64, Error> {
        let cutoff = cutoff.to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let deleted =
                    conn.execute("DELETE FROM entries WHERE stored_at < ?1", params![cutoff])?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(url: &str) -> RequestIdentity {
        RequestIdentity { method: "GET".to_string(), url: url.to_string(), vary: String::new() }
    }

    fn snapshot(body: &str) -> ResponseSnapshot {
        ResponseSnapshot::new(
            200,
            vec![("Content-Type".to_string(), "text/html".to_string())],
            body.to_string(),
        )
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = CacheStore::open_in_memory().await.unwrap();
        let id = identity("https://example.com/");

        store.put("documents", &id, snapshot("<html>home</html>")).await.unwrap();

        let hit = store.get("documents", &id).await.unwrap().unwrap();
        assert_eq!(hit.status(), 200);
        assert_eq!(hit.header("content-type"), Some("text/html"));
        assert_eq!(hit.read_body().unwrap(), bytes::Bytes::from("<html>home</html>"));
    }

    #[tokio::test]
    async fn test_get_miss_is_none() {
        let store = CacheStore::open_in_memory().await.unwrap();
        let miss = store.get("documents", &identity("https://example.com/absent")).await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = CacheStore::open_in_memory().await.unwrap();
        let id = identity("https://example.com/app.css");

        store.put("styles", &id, snapshot("old")).await.unwrap();
        store.put("styles", &id, snapshot("new")).await.unwrap();

        let hit = store.get("styles", &id).await.unwrap().unwrap();
        assert_eq!(hit.read_body().unwrap(), bytes::Bytes::from("new"));
    }

    #[tokio::test]
    async fn test_partitions_never_share_entries() {
        let store = CacheStore::open_in_memory().await.unwrap();
        let id = identity("https://example.com/pic.png");

        store.put("images", &id, snapshot("png")).await.unwrap();

        assert!(store.get("styles", &id).await.unwrap().is_none());
        assert!(store.has("images", &id).await.unwrap());
        assert!(!store.has("styles", &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_match_any_searches_all_partitions() {
        let store = CacheStore::open_in_memory().await.unwrap();
        let id = identity("https://example.com/app.js");

        assert!(store.match_any(&id).await.unwrap().is_none());

        store.put("scripts", &id, snapshot("js")).await.unwrap();
        let hit = store.match_any(&id).await.unwrap().unwrap();
        assert_eq!(hit.read_body().unwrap(), bytes::Bytes::from("js"));
    }

    #[tokio::test]
    async fn test_put_consumed_body_fails() {
        let store = CacheStore::open_in_memory().await.unwrap();
        let id = identity("https://example.com/");
        let resp = snapshot("x");
        resp.read_body().unwrap();

        let result = store.put("documents", &id, resp).await;
        assert!(matches!(result, Err(Error::BodyConsumed)));
    }

    #[tokio::test]
    async fn test_retain_partitions_reclaims_stale() {
        let store = CacheStore::open_in_memory().await.unwrap();
        store.put("documents", &identity("https://example.com/"), snapshot("a")).await.unwrap();
        store.put("v1-pages", &identity("https://example.com/old"), snapshot("b")).await.unwrap();

        let deleted = store.retain_partitions(&["documents", "images", "scripts", "styles"]).await.unwrap();
        assert_eq!(deleted, 1);

        let names = store.partitions().await.unwrap();
        assert_eq!(names, vec!["documents".to_string()]);
    }

    #[tokio::test]
    async fn test_purge_older_than() {
        let store = CacheStore::open_in_memory().await.unwrap();
        store.put("images", &identity("https://example.com/a.png"), snapshot("a")).await.unwrap();

        let future_cutoff = chrono::Utc::now() + chrono::Duration::hours(1);
        let deleted = store.purge_older_than(future_cutoff).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(store.partitions().await.unwrap().is_empty());
    }
}

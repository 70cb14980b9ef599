/// API activity log backed by SQLite
///
/// `record` never fails the caller. Write errors are logged and dropped so a
/// broken log cannot take the request path down with it.

use crate::integrations::{ActivityEvent, ActivityRecord, EventLog};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SqliteEventLog {
    pool: SqlitePool,
}

impl SqliteEventLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn insert(&self, event: &ActivityEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO api_usage (id, endpoint, method, status, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&event.endpoint)
        .bind(&event.method)
        .bind(i64::from(event.status))
        .bind(&event.user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl EventLog for SqliteEventLog {
    async fn record(&self, event: ActivityEvent) {
        match self.insert(&event).await {
            Ok(()) => tracing::debug!("Recorded {} {} -> {}", event.method, event.endpoint, event.status),
            Err(e) => tracing::warn!(
                "Failed to record API usage for {} {}: {}",
                event.method,
                event.endpoint,
                e
            ),
        }
    }

    /// Newest first
    async fn recent(&self, limit: u32) -> Result<Vec<ActivityRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, endpoint, method, status, user_id, created_at
            FROM api_usage
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let status: i64 = row.get("status");
            let created_at: DateTime<Utc> = row.get("created_at");
            records.push(ActivityRecord {
                id: row.get("id"),
                event: ActivityEvent {
                    endpoint: row.get("endpoint"),
                    method: row.get("method"),
                    status: u16::try_from(status)?,
                    user_id: row.get("user_id"),
                },
                created_at,
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Database;

    fn event(endpoint: &str, status: u16) -> ActivityEvent {
        ActivityEvent {
            endpoint: endpoint.to_string(),
            method: "POST".to_string(),
            status,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn records_and_lists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::open(dir.path()).await.unwrap();
        let log = SqliteEventLog::new(database.pool().clone());

        log.record(event("/api/place-order", 200)).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        log.record(event("/api/manage-vault", 400)).await;

        let recent = log.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].event.endpoint, "/api/manage-vault");
        assert_eq!(recent[0].event.status, 400);
        assert_eq!(recent[1].event.endpoint, "/api/place-order");

        assert_eq!(log.recent(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn record_swallows_storage_failures() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::open(dir.path()).await.unwrap();
        let log = SqliteEventLog::new(database.pool().clone());

        database.pool().close().await;

        // Must return normally even though the pool is gone
        log.record(event("/api/place-order", 200)).await;
        assert!(log.recent(10).await.is_err());
    }
}

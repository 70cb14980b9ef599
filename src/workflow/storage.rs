/// SQLite persistence for saved workflows
///
/// A saved workflow is a named graph snapshot. The snapshot is stored as a
/// JSON column; name and timestamps are kept as plain columns for listing.

use crate::workflow::types::GraphSnapshot;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

/// A named canvas as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWorkflow {
    pub id: String,
    pub name: String,
    pub snapshot: GraphSnapshot,
}

/// Listing row without the snapshot body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    pub id: String,
    pub name: String,
    pub component_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WorkflowStorage {
    pool: SqlitePool,
}

impl WorkflowStorage {
    /// The pool must already carry the schema (see `Database::open`)
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace a saved workflow
    pub async fn save_workflow(&self, workflow: &SavedWorkflow) -> Result<()> {
        let definition_json = serde_json::to_string(&workflow.snapshot)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO workflows (id, name, definition, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                definition = excluded.definition,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&workflow.id)
        .bind(&workflow.name)
        .bind(&definition_json)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::info!("Saved workflow '{}' ({})", workflow.name, workflow.id);
        Ok(())
    }

    pub async fn get_workflow(&self, id: &str) -> Result<Option<SavedWorkflow>> {
        let row = sqlx::query("SELECT id, name, definition FROM workflows WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let definition_json: String = row.get("definition");
                Ok(Some(SavedWorkflow {
                    id: row.get("id"),
                    name: row.get("name"),
                    snapshot: serde_json::from_str(&definition_json)?,
                }))
            }
            None => Ok(None),
        }
    }

    /// Most recently updated first
    pub async fn list_workflows(&self) -> Result<Vec<WorkflowMetadata>> {
        let rows = sqlx::query(
            "SELECT id, name, definition, created_at, updated_at FROM workflows ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut workflows = Vec::with_capacity(rows.len());
        for row in rows {
            let definition_json: String = row.get("definition");
            let snapshot: GraphSnapshot = serde_json::from_str(&definition_json)?;
            workflows.push(WorkflowMetadata {
                id: row.get("id"),
                name: row.get("name"),
                component_count: snapshot.components.len(),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            });
        }

        Ok(workflows)
    }

    pub async fn delete_workflow(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workflows WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Database;
    use crate::workflow::types::{ComponentInstance, Position};

    fn saved(id: &str, name: &str) -> SavedWorkflow {
        SavedWorkflow {
            id: id.to_string(),
            name: name.to_string(),
            snapshot: GraphSnapshot {
                components: vec![ComponentInstance {
                    id: "scheduler-1".to_string(),
                    type_id: "scheduler".to_string(),
                    display_name: "Hourly".to_string(),
                    config: Default::default(),
                    position: Position::new(10.0, 20.0),
                }],
                connections: vec![],
            },
        }
    }

    #[tokio::test]
    async fn save_get_list_delete() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::open(dir.path()).await.unwrap();
        let storage = WorkflowStorage::new(database.pool().clone());

        storage.save_workflow(&saved("wf-1", "First")).await.unwrap();
        storage.save_workflow(&saved("wf-2", "Second")).await.unwrap();

        let loaded = storage.get_workflow("wf-1").await.unwrap().unwrap();
        assert_eq!(loaded, saved("wf-1", "First"));

        let listed = storage.list_workflows().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|meta| meta.component_count == 1));

        assert!(storage.delete_workflow("wf-1").await.unwrap());
        assert!(!storage.delete_workflow("wf-1").await.unwrap());
        assert!(storage.get_workflow("wf-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_existing_id() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::open(dir.path()).await.unwrap();
        let storage = WorkflowStorage::new(database.pool().clone());

        storage.save_workflow(&saved("wf-1", "Draft")).await.unwrap();
        storage.save_workflow(&saved("wf-1", "Final")).await.unwrap();

        let listed = storage.list_workflows().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Final");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::query::ListParams;

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Lead,
    Estimating,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A job for a client, usually tied to one of their properties.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Project {
    pub id: Uuid,
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub property_id: Option<Uuid>,
    pub name: String,
    pub status: ProjectStatus,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProject {
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub property_id: Option<Uuid>,
    pub name: String,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub property_id: Option<Uuid>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    /// Unlink the property; takes precedence over `property_id`.
    #[serde(default)]
    pub detach_property: bool,
}

/// Count of projects in a given status, for the dashboard.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ProjectStatusCount {
    pub status: ProjectStatus,
    pub count: i64,
}

const COLUMNS: &str = "id, company_id, client_id, property_id, name, status, scheduled_start, scheduled_end, created_at, updated_at";

impl Project {
    pub async fn create(pool: &SqlitePool, data: &CreateProject) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let status = data.status.clone().unwrap_or_default();
        let sql = format!(
            r#"INSERT INTO projects (id, company_id, client_id, property_id, name, status)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(data.company_id)
            .bind(data.client_id)
            .bind(data.property_id)
            .bind(&data.name)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
        params: &ListParams,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            r#"SELECT {COLUMNS} FROM projects
               WHERE company_id = $1
               ORDER BY created_at {}
               LIMIT $2 OFFSET $3"#,
            params.order().as_sql()
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(company_id)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_client_id(
        pool: &SqlitePool,
        client_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql =
            format!("SELECT {COLUMNS} FROM projects WHERE client_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Self>(&sql)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateProject,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"UPDATE projects
               SET name            = COALESCE($2, name),
                   status          = COALESCE($3, status),
                   property_id     = CASE WHEN $7 THEN NULL ELSE COALESCE($4, property_id) END,
                   scheduled_start = COALESCE($5, scheduled_start),
                   scheduled_end   = COALESCE($6, scheduled_end),
                   updated_at      = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(&data.name)
            .bind(&data.status)
            .bind(data.property_id)
            .bind(data.scheduled_start)
            .bind(data.scheduled_end)
            .bind(data.detach_property)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Project counts grouped by status for one company.
    pub async fn count_by_status(
        pool: &SqlitePool,
        company_id: Uuid,
    ) -> Result<Vec<ProjectStatusCount>, sqlx::Error> {
        sqlx::query_as::<_, ProjectStatusCount>(
            r#"SELECT status, COUNT(*) as count
               FROM projects
               WHERE company_id = $1
               GROUP BY status
               ORDER BY status"#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// What an uploaded photo documents.
#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "image_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageKind {
    #[default]
    Before,
    After,
    Damage,
    Reference,
}

/// Metadata row for a stored project photo. The bytes live in the image
/// store under `{company_id}/{project_id}/{kind}/{id}.{ext}`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ProjectImage {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_id: Uuid,
    pub kind: ImageKind,
    pub ext: String,
    pub byte_size: i64,
    pub created_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, company_id, project_id, kind, ext, byte_size, created_at";

impl ProjectImage {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        company_id: Uuid,
        project_id: Uuid,
        kind: ImageKind,
        ext: &str,
        byte_size: i64,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"INSERT INTO project_images (id, company_id, project_id, kind, ext, byte_size)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(company_id)
            .bind(project_id)
            .bind(kind)
            .bind(ext)
            .bind(byte_size)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM project_images WHERE id = $1");
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_project_id(
        pool: &SqlitePool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM project_images WHERE project_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Storage path for this image, relative to the store root.
    pub fn storage_path(&self) -> String {
        format!(
            "{}/{}/{}/{}.{}",
            self.company_id, self.project_id, self.kind, self.id, self.ext
        )
    }
}

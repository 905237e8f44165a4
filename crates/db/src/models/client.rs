use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use utils::format::format_phone;
use uuid::Uuid;

use crate::query::ListParams;

/// A customer of the company. Owns properties and projects.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Client {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateClient {
    pub company_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl Client {
    pub async fn create(pool: &SqlitePool, data: &CreateClient) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let phone = data.phone.as_deref().map(format_phone);
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO clients (id, company_id, name, email, phone, notes)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, company_id, name, email, phone, notes, created_at, updated_at"#,
        )
        .bind(id)
        .bind(data.company_id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(phone)
        .bind(&data.notes)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"SELECT id, company_id, name, email, phone, notes, created_at, updated_at
               FROM clients WHERE id = $1"#,
        )
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
            r#"SELECT id, company_id, name, email, phone, notes, created_at, updated_at
               FROM clients
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

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateClient,
    ) -> Result<Self, sqlx::Error> {
        let phone = data.phone.as_deref().map(format_phone);
        sqlx::query_as::<_, Self>(
            r#"UPDATE clients
               SET name  = COALESCE($2, name),
                   email = COALESCE($3, email),
                   phone = COALESCE($4, phone),
                   notes = COALESCE($5, notes),
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING id, company_id, name, email, phone, notes, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(phone)
        .bind(&data.notes)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

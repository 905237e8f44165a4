use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use utils::format::format_phone;
use uuid::Uuid;

/// A supplier or subcontractor the company buys from.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Vendor {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub trade: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateVendor {
    pub company_id: Uuid,
    pub name: String,
    pub trade: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateVendor {
    pub name: Option<String>,
    pub trade: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

const COLUMNS: &str = "id, company_id, name, trade, email, phone, created_at, updated_at";

impl Vendor {
    pub async fn create(pool: &SqlitePool, data: &CreateVendor) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let phone = data.phone.as_deref().map(format_phone);
        let sql = format!(
            r#"INSERT INTO vendors (id, company_id, name, trade, email, phone)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(data.company_id)
            .bind(&data.name)
            .bind(&data.trade)
            .bind(&data.email)
            .bind(phone)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM vendors WHERE id = $1");
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM vendors WHERE company_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Self>(&sql)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateVendor,
    ) -> Result<Self, sqlx::Error> {
        let phone = data.phone.as_deref().map(format_phone);
        let sql = format!(
            r#"UPDATE vendors
               SET name  = COALESCE($2, name),
                   trade = COALESCE($3, trade),
                   email = COALESCE($4, email),
                   phone = COALESCE($5, phone),
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(&data.name)
            .bind(&data.trade)
            .bind(&data.email)
            .bind(phone)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

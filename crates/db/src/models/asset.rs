use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Company equipment: sprayers, ladders, vehicles.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Asset {
    pub id: Uuid,
    pub company_id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub name: String,
    pub purchase_price: Option<f64>,
    pub purchased_on: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateAsset {
    pub company_id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub name: String,
    pub purchase_price: Option<f64>,
    pub purchased_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateAsset {
    pub vendor_id: Option<Uuid>,
    pub name: Option<String>,
    pub purchase_price: Option<f64>,
    pub purchased_on: Option<DateTime<Utc>>,
}

const COLUMNS: &str =
    "id, company_id, vendor_id, name, purchase_price, purchased_on, created_at, updated_at";

impl Asset {
    pub async fn create(pool: &SqlitePool, data: &CreateAsset) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let sql = format!(
            r#"INSERT INTO assets (id, company_id, vendor_id, name, purchase_price, purchased_on)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(data.company_id)
            .bind(data.vendor_id)
            .bind(&data.name)
            .bind(data.purchase_price)
            .bind(data.purchased_on)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM assets WHERE company_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Self>(&sql)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateAsset,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"UPDATE assets
               SET vendor_id      = COALESCE($2, vendor_id),
                   name           = COALESCE($3, name),
                   purchase_price = COALESCE($4, purchase_price),
                   purchased_on   = COALESCE($5, purchased_on),
                   updated_at     = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(data.vendor_id)
            .bind(&data.name)
            .bind(data.purchase_price)
            .bind(data.purchased_on)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

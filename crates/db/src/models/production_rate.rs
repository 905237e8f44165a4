use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use utils::sku::sku_label;
use uuid::Uuid;

/// Reference definition for a unit of billable work: how many hours the task
/// normally takes and what it bills per hour. Material line items ride along.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ProductionRate {
    pub id: Uuid,
    pub company_id: Uuid,
    pub template_id: Option<Uuid>,
    pub code: String,
    pub label: String,
    pub standard_hours: f64,
    pub hourly_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct RateMaterial {
    pub id: Uuid,
    pub rate_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Named grouping of a company's production rates.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct RateTemplate {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProductionRate {
    pub company_id: Uuid,
    pub template_id: Option<Uuid>,
    pub code: String,
    pub label: String,
    pub standard_hours: f64,
    pub hourly_rate: f64,
    pub materials: Option<Vec<CreateRateMaterial>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateRateMaterial {
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateProductionRate {
    pub label: Option<String>,
    pub standard_hours: Option<f64>,
    pub hourly_rate: Option<f64>,
    pub template_id: Option<Uuid>,
}

/// A rate with its material line items, as consumed by the labor calculator.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct RateWithMaterials {
    #[serde(flatten)]
    #[ts(flatten)]
    pub rate: ProductionRate,
    pub materials: Vec<RateMaterial>,
}

const COLUMNS: &str = "id, company_id, template_id, code, label, standard_hours, hourly_rate, created_at, updated_at";
const MATERIAL_COLUMNS: &str = "id, rate_id, name, quantity, unit_price";

impl ProductionRate {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateProductionRate,
    ) -> Result<RateWithMaterials, sqlx::Error> {
        let id = Uuid::new_v4();
        let sql = format!(
            r#"INSERT INTO production_rates (id, company_id, template_id, code, label, standard_hours, hourly_rate)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {COLUMNS}"#
        );
        let rate = sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(data.company_id)
            .bind(data.template_id)
            .bind(&data.code)
            .bind(&data.label)
            .bind(data.standard_hours)
            .bind(data.hourly_rate)
            .fetch_one(pool)
            .await?;

        let mut materials = Vec::new();
        if let Some(items) = &data.materials {
            for item in items {
                materials.push(RateMaterial::create(pool, rate.id, item).await?);
            }
        }
        Ok(RateWithMaterials { rate, materials })
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM production_rates WHERE id = $1");
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql =
            format!("SELECT {COLUMNS} FROM production_rates WHERE company_id = $1 ORDER BY code ASC");
        sqlx::query_as::<_, Self>(&sql)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// The company's full rate book, material items included.
    pub async fn find_with_materials_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
    ) -> Result<Vec<RateWithMaterials>, sqlx::Error> {
        let rates = Self::find_by_company_id(pool, company_id).await?;
        let mut out = Vec::with_capacity(rates.len());
        for rate in rates {
            let materials = RateMaterial::find_by_rate_id(pool, rate.id).await?;
            out.push(RateWithMaterials { rate, materials });
        }
        Ok(out)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateProductionRate,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"UPDATE production_rates
               SET label          = COALESCE($2, label),
                   standard_hours = COALESCE($3, standard_hours),
                   hourly_rate    = COALESCE($4, hourly_rate),
                   template_id    = COALESCE($5, template_id),
                   updated_at     = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(&data.label)
            .bind(data.standard_hours)
            .bind(data.hourly_rate)
            .bind(data.template_id)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM production_rates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl RateMaterial {
    pub async fn create(
        pool: &SqlitePool,
        rate_id: Uuid,
        data: &CreateRateMaterial,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        // Catalog SKUs expand to their product labels; free-form names pass
        // through untouched.
        let name = sku_label(&data.name);
        let sql = format!(
            r#"INSERT INTO rate_materials (id, rate_id, name, quantity, unit_price)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {MATERIAL_COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(rate_id)
            .bind(name)
            .bind(data.quantity)
            .bind(data.unit_price)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_rate_id(pool: &SqlitePool, rate_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM rate_materials WHERE rate_id = $1");
        sqlx::query_as::<_, Self>(&sql)
            .bind(rate_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rate_materials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl RateTemplate {
    pub async fn create(
        pool: &SqlitePool,
        company_id: Uuid,
        name: &str,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO rate_templates (id, company_id, name)
               VALUES ($1, $2, $3)
               RETURNING id, company_id, name, created_at"#,
        )
        .bind(id)
        .bind(company_id)
        .bind(name)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"SELECT id, company_id, name, created_at
               FROM rate_templates
               WHERE company_id = $1
               ORDER BY name ASC"#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rate_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

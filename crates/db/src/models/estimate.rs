use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "estimate_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EstimateStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Declined,
}

/// How the estimate's discount is expressed.
#[derive(Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[sqlx(type_name = "discount_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiscountKind {
    Percent,
    Fixed,
}

#[derive(Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default)]
#[sqlx(type_name = "line_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LineKind {
    #[default]
    Labor,
    Material,
    Other,
}

/// A priced proposal for a project. Stored totals are derived from the lines
/// by the recompute service and never edited directly.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Estimate {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_id: Uuid,
    pub status: EstimateStatus,
    pub discount_kind: Option<DiscountKind>,
    pub discount_value: f64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub profit: f64,
    pub tax: f64,
    pub processing_fee: f64,
    pub grand_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct EstimateLine {
    pub id: Uuid,
    pub estimate_id: Uuid,
    pub kind: LineKind,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateEstimate {
    pub company_id: Uuid,
    pub project_id: Uuid,
    pub discount_kind: Option<DiscountKind>,
    pub discount_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateEstimate {
    pub status: Option<EstimateStatus>,
    pub discount_kind: Option<DiscountKind>,
    pub discount_value: Option<f64>,
    /// Remove the discount entirely; takes precedence over the two fields
    /// above.
    #[serde(default)]
    pub clear_discount: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateEstimateLine {
    pub kind: Option<LineKind>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Derived totals written back after recomputation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct EstimateTotals {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub profit: f64,
    pub tax: f64,
    pub processing_fee: f64,
    pub grand_total: f64,
}

const COLUMNS: &str = "id, company_id, project_id, status, discount_kind, discount_value, subtotal, discount_amount, profit, tax, processing_fee, grand_total, created_at, updated_at";
const LINE_COLUMNS: &str = "id, estimate_id, kind, description, quantity, unit_price, total, created_at";

impl Estimate {
    pub async fn create(pool: &SqlitePool, data: &CreateEstimate) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let sql = format!(
            r#"INSERT INTO estimates (id, company_id, project_id, discount_kind, discount_value)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(data.company_id)
            .bind(data.project_id)
            .bind(&data.discount_kind)
            .bind(data.discount_value.unwrap_or(0.0))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM estimates WHERE id = $1");
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_project_id(
        pool: &SqlitePool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql =
            format!("SELECT {COLUMNS} FROM estimates WHERE project_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Self>(&sql)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateEstimate,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"UPDATE estimates
               SET status         = COALESCE($2, status),
                   discount_kind  = CASE WHEN $5 THEN NULL ELSE COALESCE($3, discount_kind) END,
                   discount_value = CASE WHEN $5 THEN 0.0 ELSE COALESCE($4, discount_value) END,
                   updated_at     = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(&data.status)
            .bind(&data.discount_kind)
            .bind(data.discount_value)
            .bind(data.clear_discount)
            .fetch_one(pool)
            .await
    }

    /// Persist recomputed totals. Only the recompute service calls this.
    pub async fn update_totals(
        pool: &SqlitePool,
        id: Uuid,
        totals: &EstimateTotals,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"UPDATE estimates
               SET subtotal        = $2,
                   discount_amount = $3,
                   profit          = $4,
                   tax             = $5,
                   processing_fee  = $6,
                   grand_total     = $7,
                   updated_at      = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(totals.subtotal)
            .bind(totals.discount_amount)
            .bind(totals.profit)
            .bind(totals.tax)
            .bind(totals.processing_fee)
            .bind(totals.grand_total)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM estimates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl EstimateLine {
    pub async fn create(
        pool: &SqlitePool,
        estimate_id: Uuid,
        data: &CreateEstimateLine,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let kind = data.kind.clone().unwrap_or_default();
        let total = data.quantity * data.unit_price;
        let sql = format!(
            r#"INSERT INTO estimate_lines (id, estimate_id, kind, description, quantity, unit_price, total)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {LINE_COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(estimate_id)
            .bind(kind)
            .bind(&data.description)
            .bind(data.quantity)
            .bind(data.unit_price)
            .bind(total)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_estimate_id(
        pool: &SqlitePool,
        estimate_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {LINE_COLUMNS} FROM estimate_lines WHERE estimate_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(estimate_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM estimate_lines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

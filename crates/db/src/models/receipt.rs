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
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    #[default]
    Check,
    Card,
    Transfer,
}

/// A payment received against an invoice or project.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Receipt {
    pub id: Uuid,
    pub company_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub memo: Option<String>,
    pub received_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateReceipt {
    pub company_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub amount: f64,
    pub method: Option<PaymentMethod>,
    pub memo: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
}

/// Receipts summed into one calendar month.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct MonthlyReceiptTotal {
    pub month: i64,
    pub total: f64,
}

const COLUMNS: &str =
    "id, company_id, invoice_id, project_id, amount, method, memo, received_at, created_at";

impl Receipt {
    pub async fn create(pool: &SqlitePool, data: &CreateReceipt) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let method = data.method.clone().unwrap_or_default();
        let received_at = data.received_at.unwrap_or_else(Utc::now);
        let sql = format!(
            r#"INSERT INTO receipts (id, company_id, invoice_id, project_id, amount, method, memo, received_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(data.company_id)
            .bind(data.invoice_id)
            .bind(data.project_id)
            .bind(data.amount)
            .bind(method)
            .bind(&data.memo)
            .bind(received_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM receipts WHERE id = $1");
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
            r#"SELECT {COLUMNS} FROM receipts
               WHERE company_id = $1
               ORDER BY received_at {}
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

    pub async fn find_by_invoice_id(
        pool: &SqlitePool,
        invoice_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql =
            format!("SELECT {COLUMNS} FROM receipts WHERE invoice_id = $1 ORDER BY received_at ASC");
        sqlx::query_as::<_, Self>(&sql)
            .bind(invoice_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM receipts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Total received in the given calendar year.
    pub async fn received_total_for_year(
        pool: &SqlitePool,
        company_id: Uuid,
        year: i32,
    ) -> Result<f64, sqlx::Error> {
        let year_str = format!("{year:04}");
        sqlx::query_scalar::<_, f64>(
            r#"SELECT COALESCE(SUM(amount), 0.0)
               FROM receipts
               WHERE company_id = $1
                 AND strftime('%Y', received_at) = $2"#,
        )
        .bind(company_id)
        .bind(year_str)
        .fetch_one(pool)
        .await
    }

    /// Per-month received totals for the given year. Months with no receipts
    /// are absent; callers fill the gaps.
    pub async fn monthly_totals_for_year(
        pool: &SqlitePool,
        company_id: Uuid,
        year: i32,
    ) -> Result<Vec<MonthlyReceiptTotal>, sqlx::Error> {
        let year_str = format!("{year:04}");
        sqlx::query_as::<_, MonthlyReceiptTotal>(
            r#"SELECT CAST(strftime('%m', received_at) AS INTEGER) as month,
                      COALESCE(SUM(amount), 0.0) as total
               FROM receipts
               WHERE company_id = $1
                 AND strftime('%Y', received_at) = $2
               GROUP BY month
               ORDER BY month ASC"#,
        )
        .bind(company_id)
        .bind(year_str)
        .fetch_all(pool)
        .await
    }
}

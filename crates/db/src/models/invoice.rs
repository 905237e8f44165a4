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
#[sqlx(type_name = "invoice_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Void,
}

/// A bill sent to a client for a project.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Invoice {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_id: Uuid,
    pub number: String,
    pub status: InvoiceStatus,
    pub amount: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub issued_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateInvoice {
    pub company_id: Uuid,
    pub project_id: Uuid,
    pub number: String,
    pub amount: f64,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateInvoice {
    pub status: Option<InvoiceStatus>,
    pub amount: Option<f64>,
    pub due_date: Option<DateTime<Utc>>,
}

const COLUMNS: &str = "id, company_id, project_id, number, status, amount, due_date, issued_at, created_at, updated_at";

impl Invoice {
    pub async fn create(pool: &SqlitePool, data: &CreateInvoice) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let sql = format!(
            r#"INSERT INTO invoices (id, company_id, project_id, number, amount, due_date)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(data.company_id)
            .bind(data.project_id)
            .bind(&data.number)
            .bind(data.amount)
            .bind(data.due_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM invoices WHERE id = $1");
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
            r#"SELECT {COLUMNS} FROM invoices
               WHERE company_id = $1
               ORDER BY issued_at {}
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

    pub async fn find_by_project_id(
        pool: &SqlitePool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql =
            format!("SELECT {COLUMNS} FROM invoices WHERE project_id = $1 ORDER BY issued_at DESC");
        sqlx::query_as::<_, Self>(&sql)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateInvoice,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"UPDATE invoices
               SET status     = COALESCE($2, status),
                   amount     = COALESCE($3, amount),
                   due_date   = COALESCE($4, due_date),
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(&data.status)
            .bind(data.amount)
            .bind(data.due_date)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Sum of non-void invoice amounts issued in the given calendar year.
    pub async fn invoiced_total_for_year(
        pool: &SqlitePool,
        company_id: Uuid,
        year: i32,
    ) -> Result<f64, sqlx::Error> {
        let year_str = format!("{year:04}");
        sqlx::query_scalar::<_, f64>(
            r#"SELECT COALESCE(SUM(amount), 0.0)
               FROM invoices
               WHERE company_id = $1
                 AND status != 'void'
                 AND strftime('%Y', issued_at) = $2"#,
        )
        .bind(company_id)
        .bind(year_str)
        .fetch_one(pool)
        .await
    }

    /// Total still owed on sent invoices: amount minus receipts applied.
    pub async fn outstanding_total(
        pool: &SqlitePool,
        company_id: Uuid,
    ) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar::<_, f64>(
            r#"SELECT COALESCE(SUM(i.amount - COALESCE(
                   (SELECT SUM(r.amount) FROM receipts r WHERE r.invoice_id = i.id), 0.0)), 0.0)
               FROM invoices i
               WHERE i.company_id = $1
                 AND i.status = 'sent'"#,
        )
        .bind(company_id)
        .fetch_one(pool)
        .await
    }
}

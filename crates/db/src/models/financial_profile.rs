use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Per-company pricing constants used by the estimate calculators.
///
/// One row per company; created on demand with default rates.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct FinancialProfile {
    pub id: Uuid,
    pub company_id: Uuid,
    pub tax_rate: f64,
    pub profit_margin: f64,
    pub card_fee_rate: f64,
    pub card_fee_fixed: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A flat monthly cost folded into every estimate's grand total.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct OperatingFee {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub label: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateFinancialProfile {
    pub tax_rate: Option<f64>,
    pub profit_margin: Option<f64>,
    pub card_fee_rate: Option<f64>,
    pub card_fee_fixed: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateOperatingFee {
    pub label: String,
    pub amount: f64,
}

const COLUMNS: &str = "id, company_id, tax_rate, profit_margin, card_fee_rate, card_fee_fixed, created_at, updated_at";
const FEE_COLUMNS: &str = "id, profile_id, label, amount, created_at";

impl FinancialProfile {
    /// Fetch the company's profile, creating one with default rates if the
    /// company has never configured pricing.
    pub async fn find_or_create(
        pool: &SqlitePool,
        company_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM financial_profiles WHERE company_id = $1");
        if let Some(profile) = sqlx::query_as::<_, Self>(&sql)
            .bind(company_id)
            .fetch_optional(pool)
            .await?
        {
            return Ok(profile);
        }

        let id = Uuid::new_v4();
        let sql = format!(
            r#"INSERT INTO financial_profiles (id, company_id)
               VALUES ($1, $2)
               ON CONFLICT(company_id) DO UPDATE SET updated_at = updated_at
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(company_id)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        company_id: Uuid,
        data: &UpdateFinancialProfile,
    ) -> Result<Self, sqlx::Error> {
        // Ensure the row exists before patching it.
        Self::find_or_create(pool, company_id).await?;
        let sql = format!(
            r#"UPDATE financial_profiles
               SET tax_rate       = COALESCE($2, tax_rate),
                   profit_margin  = COALESCE($3, profit_margin),
                   card_fee_rate  = COALESCE($4, card_fee_rate),
                   card_fee_fixed = COALESCE($5, card_fee_fixed),
                   updated_at     = datetime('now', 'subsec')
               WHERE company_id = $1
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(company_id)
            .bind(data.tax_rate)
            .bind(data.profit_margin)
            .bind(data.card_fee_rate)
            .bind(data.card_fee_fixed)
            .fetch_one(pool)
            .await
    }

    pub async fn operating_fees(&self, pool: &SqlitePool) -> Result<Vec<OperatingFee>, sqlx::Error> {
        OperatingFee::find_by_profile_id(pool, self.id).await
    }

    /// Sum of the flat operating fees attached to this profile.
    pub async fn operating_fees_total(&self, pool: &SqlitePool) -> Result<f64, sqlx::Error> {
        // The fallback must be a REAL literal; an INTEGER zero does not
        // decode into f64.
        sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(amount), 0.0) FROM operating_fees WHERE profile_id = $1",
        )
        .bind(self.id)
        .fetch_one(pool)
        .await
    }
}

impl OperatingFee {
    pub async fn create(
        pool: &SqlitePool,
        profile_id: Uuid,
        data: &CreateOperatingFee,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let sql = format!(
            r#"INSERT INTO operating_fees (id, profile_id, label, amount)
               VALUES ($1, $2, $3, $4)
               RETURNING {FEE_COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(profile_id)
            .bind(&data.label)
            .bind(data.amount)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_profile_id(
        pool: &SqlitePool,
        profile_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {FEE_COLUMNS} FROM operating_fees WHERE profile_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM operating_fees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

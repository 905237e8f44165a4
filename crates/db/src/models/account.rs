use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "account_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccountKind {
    Income,
    #[default]
    Expense,
    Asset,
    Liability,
}

/// A ledger account. The stored balance is recomputed from entries after
/// every mutation, never adjusted incrementally.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Account {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub company_id: Uuid,
    pub account_id: Uuid,
    pub amount: f64,
    pub memo: Option<String>,
    pub entry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateAccount {
    pub company_id: Uuid,
    pub name: String,
    pub kind: Option<AccountKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateLedgerEntry {
    pub amount: f64,
    pub memo: Option<String>,
    pub entry_date: Option<DateTime<Utc>>,
}

const COLUMNS: &str = "id, company_id, name, kind, balance, created_at, updated_at";
const ENTRY_COLUMNS: &str = "id, company_id, account_id, amount, memo, entry_date, created_at";

impl Account {
    pub async fn create(pool: &SqlitePool, data: &CreateAccount) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let kind = data.kind.clone().unwrap_or_default();
        let sql = format!(
            r#"INSERT INTO accounts (id, company_id, name, kind)
               VALUES ($1, $2, $3, $4)
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(data.company_id)
            .bind(&data.name)
            .bind(kind)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM accounts WHERE company_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Self>(&sql)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Recompute the stored balance from the entries and return the account.
    pub async fn recompute_balance(pool: &SqlitePool, id: Uuid) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"UPDATE accounts
               SET balance = COALESCE(
                       (SELECT SUM(amount) FROM ledger_entries WHERE account_id = $1), 0.0),
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql).bind(id).fetch_one(pool).await
    }
}

impl LedgerEntry {
    pub async fn create(
        pool: &SqlitePool,
        company_id: Uuid,
        account_id: Uuid,
        data: &CreateLedgerEntry,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let entry_date = data.entry_date.unwrap_or_else(Utc::now);
        let sql = format!(
            r#"INSERT INTO ledger_entries (id, company_id, account_id, amount, memo, entry_date)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {ENTRY_COLUMNS}"#
        );
        let entry = sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(company_id)
            .bind(account_id)
            .bind(data.amount)
            .bind(&data.memo)
            .bind(entry_date)
            .fetch_one(pool)
            .await?;
        Account::recompute_balance(pool, account_id).await?;
        Ok(entry)
    }

    pub async fn find_by_account_id(
        pool: &SqlitePool,
        account_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entries WHERE account_id = $1 ORDER BY entry_date DESC"
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(account_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let account_id: Option<Uuid> =
            sqlx::query_scalar("SELECT account_id FROM ledger_entries WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        let result = sqlx::query("DELETE FROM ledger_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if let Some(account_id) = account_id {
            Account::recompute_balance(pool, account_id).await?;
        }
        Ok(result.rows_affected())
    }
}

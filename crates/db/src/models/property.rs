use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A physical site belonging to a client: the house or building being
/// painted or repaired.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Property {
    pub id: Uuid,
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub stories: Option<i64>,
    pub square_feet: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProperty {
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub stories: Option<i64>,
    pub square_feet: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateProperty {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub stories: Option<i64>,
    pub square_feet: Option<f64>,
}

const COLUMNS: &str = "id, company_id, client_id, address1, address2, city, state, zip, stories, square_feet, created_at, updated_at";

impl Property {
    pub async fn create(pool: &SqlitePool, data: &CreateProperty) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let sql = format!(
            r#"INSERT INTO properties (id, company_id, client_id, address1, address2, city, state, zip, stories, square_feet)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(data.company_id)
            .bind(data.client_id)
            .bind(&data.address1)
            .bind(&data.address2)
            .bind(&data.city)
            .bind(&data.state)
            .bind(&data.zip)
            .bind(data.stories)
            .bind(data.square_feet)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_client_id(
        pool: &SqlitePool,
        client_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql =
            format!("SELECT {COLUMNS} FROM properties WHERE client_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Self>(&sql)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateProperty,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"UPDATE properties
               SET address1    = COALESCE($2, address1),
                   address2    = COALESCE($3, address2),
                   city        = COALESCE($4, city),
                   state       = COALESCE($5, state),
                   zip         = COALESCE($6, zip),
                   stories     = COALESCE($7, stories),
                   square_feet = COALESCE($8, square_feet),
                   updated_at  = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(&data.address1)
            .bind(&data.address2)
            .bind(&data.city)
            .bind(&data.state)
            .bind(&data.zip)
            .bind(data.stories)
            .bind(data.square_feet)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

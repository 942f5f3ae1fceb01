use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::error::AppResult;

/// A bookable unit. Reservations reference it by `name`; the row itself is
/// administered externally apart from description edits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cabin {
    pub id: String,
    pub name: String,
    pub guests: i32,
    pub price: i32,
    pub original_price: Option<i32>,
    pub image: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub async fn list(db: &PgPool) -> AppResult<Vec<Cabin>> {
    let cabins = sqlx::query_as::<_, Cabin>(
        r#"
        SELECT id, name, guests, price, original_price, image, description,
               created_at, updated_at
        FROM cabins
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(cabins)
}

pub async fn find_by_id(db: &PgPool, id: &str) -> AppResult<Option<Cabin>> {
    let cabin = sqlx::query_as::<_, Cabin>(
        r#"
        SELECT id, name, guests, price, original_price, image, description,
               created_at, updated_at
        FROM cabins
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(cabin)
}

pub async fn find_by_name(db: &PgPool, name: &str) -> AppResult<Option<Cabin>> {
    let cabin = sqlx::query_as::<_, Cabin>(
        r#"
        SELECT id, name, guests, price, original_price, image, description,
               created_at, updated_at
        FROM cabins
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(db)
    .await?;
    Ok(cabin)
}

/// Edit a cabin's description. The cabin is a shared row read by many
/// reservations, so this stays its own operation instead of a side door of
/// the reservation update.
pub async fn update_description(
    db: &PgPool,
    id: &str,
    description: &str,
) -> AppResult<Option<Cabin>> {
    let cabin = sqlx::query_as::<_, Cabin>(
        r#"
        UPDATE cabins
        SET description = $2, updated_at = now()
        WHERE id = $1
        RETURNING id, name, guests, price, original_price, image, description,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(description)
    .fetch_optional(db)
    .await?;
    Ok(cabin)
}

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::dto::iso_date;
use crate::error::{AppError, AppResult};

/// A confirmed booking of one cabin for a contiguous date range, as stored.
/// Serializes straight onto the wire in camelCase.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub cabin_name: String,
    pub user_id: String,
    pub user_email: String,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    pub number_of_guests: i32,
    pub number_of_nights: i32,
    pub price_per_night: i32,
    pub total_price: i32,
    pub currency: String,
    pub special_requests: Option<String>,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Reservation {
    /// Closed-interval overlap between two stays. Ranges that merely touch
    /// on a boundary day count as a conflict, so same-day
    /// checkout/check-in turnover is rejected.
    pub fn dates_conflict(start: Date, end: Date, other_start: Date, other_end: Date) -> bool {
        other_start <= end && other_end >= start
    }
}

/// Validated input for the check-and-insert; all derived figures are
/// computed by the caller from the parsed dates, not taken from the client.
#[derive(Debug)]
pub struct NewReservation {
    pub cabin_name: String,
    pub user_id: String,
    pub user_email: String,
    pub start_date: Date,
    pub end_date: Date,
    pub number_of_guests: i32,
    pub number_of_nights: i32,
    pub price_per_night: i32,
    pub total_price: i32,
    pub currency: String,
    pub special_requests: Option<String>,
}

/// Availability check plus insert as one transaction. The transaction is
/// pinned to SERIALIZABLE so two concurrent requests for intersecting
/// ranges on the same cabin cannot both commit: the loser fails with a
/// serialization error, surfaced as the same conflict the up-front check
/// reports.
pub async fn create(db: &PgPool, new: NewReservation) -> AppResult<Reservation> {
    let mut tx = db.begin().await?;

    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;

    let booked: Vec<(Date, Date)> = sqlx::query_as(
        r#"
        SELECT start_date, end_date
        FROM reservations
        WHERE cabin_name = $1 AND status = 'confirmed'
        "#,
    )
    .bind(&new.cabin_name)
    .fetch_all(&mut *tx)
    .await?;

    if booked
        .iter()
        .any(|&(start, end)| Reservation::dates_conflict(new.start_date, new.end_date, start, end))
    {
        return Err(AppError::Conflict(
            "The cabin is already booked for the selected dates".into(),
        ));
    }

    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        INSERT INTO reservations
            (cabin_name, user_id, user_email, start_date, end_date,
             number_of_guests, number_of_nights, price_per_night,
             total_price, currency, special_requests, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'confirmed')
        RETURNING id, cabin_name, user_id, user_email, start_date, end_date,
                  number_of_guests, number_of_nights, price_per_night,
                  total_price, currency, special_requests, status,
                  created_at, updated_at
        "#,
    )
    .bind(&new.cabin_name)
    .bind(&new.user_id)
    .bind(&new.user_email)
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(new.number_of_guests)
    .bind(new.number_of_nights)
    .bind(new.price_per_night)
    .bind(new.total_price)
    .bind(&new.currency)
    .bind(&new.special_requests)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_serialization_conflict)?;

    tx.commit().await.map_err(map_serialization_conflict)?;

    Ok(reservation)
}

// SQLSTATE 40001: this transaction lost to a concurrent overlapping commit.
fn map_serialization_conflict(err: sqlx::Error) -> AppError {
    let lost_serialization = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "40001")
        .unwrap_or(false);
    if lost_serialization {
        AppError::Conflict("The cabin is already booked for the selected dates".into())
    } else {
        AppError::Database(err)
    }
}

pub async fn list_by_email(db: &PgPool, email: &str) -> AppResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, cabin_name, user_id, user_email, start_date, end_date,
               number_of_guests, number_of_nights, price_per_night,
               total_price, currency, special_requests, status,
               created_at, updated_at
        FROM reservations
        WHERE user_email = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(email)
    .fetch_all(db)
    .await?;
    Ok(reservations)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> AppResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, cabin_name, user_id, user_email, start_date, end_date,
               number_of_guests, number_of_nights, price_per_night,
               total_price, currency, special_requests, status,
               created_at, updated_at
        FROM reservations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(reservation)
}

/// Change the guest count only. Dates are immutable after creation, so no
/// availability re-check happens here.
pub async fn update_guest_count(
    db: &PgPool,
    id: Uuid,
    number_of_guests: i32,
) -> AppResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        UPDATE reservations
        SET number_of_guests = $2, updated_at = now()
        WHERE id = $1
        RETURNING id, cabin_name, user_id, user_email, start_date, end_date,
                  number_of_guests, number_of_nights, price_per_night,
                  total_price, currency, special_requests, status,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(number_of_guests)
    .fetch_optional(db)
    .await?;
    Ok(reservation)
}

/// Cancellation is physical deletion. Returns the removed id, or `None`
/// when the row was already gone.
pub async fn delete(db: &PgPool, id: Uuid) -> AppResult<Option<Uuid>> {
    let deleted = sqlx::query_scalar::<_, Uuid>(
        "DELETE FROM reservations WHERE id = $1 RETURNING id",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn intersecting_ranges_conflict() {
        // Existing stay Aug 10-15, candidate Aug 14-18.
        assert!(Reservation::dates_conflict(
            date!(2025 - 08 - 14),
            date!(2025 - 08 - 18),
            date!(2025 - 08 - 10),
            date!(2025 - 08 - 15),
        ));
    }

    #[test]
    fn same_day_turnover_conflicts_under_the_closed_interval_rule() {
        // Checkout on the 15th, candidate check-in on the 15th: rejected.
        assert!(Reservation::dates_conflict(
            date!(2025 - 08 - 15),
            date!(2025 - 08 - 18),
            date!(2025 - 08 - 10),
            date!(2025 - 08 - 15),
        ));
    }

    #[test]
    fn disjoint_ranges_do_not_conflict() {
        assert!(!Reservation::dates_conflict(
            date!(2025 - 08 - 16),
            date!(2025 - 08 - 18),
            date!(2025 - 08 - 10),
            date!(2025 - 08 - 15),
        ));
        assert!(!Reservation::dates_conflict(
            date!(2025 - 08 - 01),
            date!(2025 - 08 - 09),
            date!(2025 - 08 - 10),
            date!(2025 - 08 - 15),
        ));
    }

    #[test]
    fn containment_conflicts_both_ways() {
        // Candidate inside existing.
        assert!(Reservation::dates_conflict(
            date!(2025 - 08 - 11),
            date!(2025 - 08 - 13),
            date!(2025 - 08 - 10),
            date!(2025 - 08 - 15),
        ));
        // Existing inside candidate.
        assert!(Reservation::dates_conflict(
            date!(2025 - 08 - 01),
            date!(2025 - 08 - 31),
            date!(2025 - 08 - 10),
            date!(2025 - 08 - 15),
        ));
    }

    #[test]
    fn conflict_is_symmetric() {
        let pairs = [
            (date!(2025 - 08 - 10), date!(2025 - 08 - 15)),
            (date!(2025 - 08 - 14), date!(2025 - 08 - 18)),
        ];
        let [(a_start, a_end), (b_start, b_end)] = pairs;
        assert_eq!(
            Reservation::dates_conflict(a_start, a_end, b_start, b_end),
            Reservation::dates_conflict(b_start, b_end, a_start, a_end),
        );
    }
}

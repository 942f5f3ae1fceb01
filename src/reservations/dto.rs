use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo::Reservation;
use crate::cabins::repo::Cabin;

pub(crate) const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Stay dates arrive either as full RFC 3339 timestamps (the widget posts
/// `toISOString()` output) or as plain `YYYY-MM-DD`.
pub(crate) fn parse_stay_date(raw: &str) -> Option<Date> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt.date());
    }
    Date::parse(raw, DATE_FORMAT).ok()
}

/// Serde adapter rendering stay dates as `YYYY-MM-DD` on the wire.
pub(crate) mod iso_date {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = date.format(super::DATE_FORMAT).map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_stay_date(&raw).ok_or_else(|| D::Error::custom("invalid date"))
    }
}

/// `POST /reservations` body. Every field is optional at the serde layer so
/// the handler can report missing fields itself instead of bouncing the
/// whole body as undeserializable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub cabin_name: Option<String>,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub number_of_guests: Option<i32>,
    pub number_of_nights: Option<i32>,
    pub price_per_night: Option<i32>,
    pub total_price: Option<i32>,
    pub currency: Option<String>,
    pub special_requests: Option<String>,
}

/// `PUT /reservations/{id}` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    pub number_of_guests: Option<i32>,
    pub cabin_description: Option<String>,
    pub cabin_id: Option<String>,
}

/// Cabin fields attached to reservation listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinSummary {
    pub image: String,
    pub name: String,
    pub id: String,
}

impl From<Cabin> for CabinSummary {
    fn from(cabin: Cabin) -> Self {
        Self {
            image: cabin.image,
            name: cabin.name,
            id: cabin.id,
        }
    }
}

/// Cabin fields the edit flow needs from `GET /reservations/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinDetails {
    pub id: String,
    pub description: Option<String>,
    pub guests: i32,
    pub image: String,
}

impl From<Cabin> for CabinDetails {
    fn from(cabin: Cabin) -> Self {
        Self {
            id: cabin.id,
            description: cabin.description,
            guests: cabin.guests,
            image: cabin.image,
        }
    }
}

/// A reservation joined (by cabin name) to its cabin summary; `cabin` is
/// null when the lookup misses rather than the read failing.
#[derive(Debug, Serialize)]
pub struct ReservationWithCabin {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub cabin: Option<CabinSummary>,
}

#[derive(Debug, Serialize)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub cabin: Option<CabinDetails>,
}

#[derive(Debug, Serialize)]
pub struct CreatedReservationResponse {
    pub message: String,
    pub reservation: ReservationWithCabin,
}

#[derive(Debug, Serialize)]
pub struct ReservationDetailResponse {
    pub reservation: ReservationDetail,
}

#[derive(Debug, Serialize)]
pub struct UpdatedReservationResponse {
    pub message: String,
    pub reservation: Reservation,
}

#[derive(Debug, Serialize)]
pub struct DeletedReservationResponse {
    pub message: String,
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn stay_dates_parse_from_iso_timestamps_and_plain_dates() {
        assert_eq!(
            parse_stay_date("2025-08-10T00:00:00.000Z"),
            Some(date!(2025 - 08 - 10))
        );
        assert_eq!(
            parse_stay_date("2025-08-10T18:30:00Z"),
            Some(date!(2025 - 08 - 10))
        );
        assert_eq!(parse_stay_date("2025-08-10"), Some(date!(2025 - 08 - 10)));
    }

    #[test]
    fn garbage_dates_do_not_parse() {
        assert_eq!(parse_stay_date("not-a-date"), None);
        assert_eq!(parse_stay_date("2025-13-40"), None);
        assert_eq!(parse_stay_date(""), None);
    }

    #[test]
    fn create_request_reads_camel_case_keys() {
        let body: CreateReservationRequest = serde_json::from_value(serde_json::json!({
            "cabinName": "Cabin 003",
            "userEmail": "guest@example.com",
            "startDate": "2025-08-10",
            "endDate": "2025-08-15",
            "numberOfGuests": 2,
            "pricePerNight": 3000,
        }))
        .expect("deserialize");
        assert_eq!(body.cabin_name.as_deref(), Some("Cabin 003"));
        assert_eq!(body.number_of_guests, Some(2));
        assert_eq!(body.special_requests, None);
    }

    #[test]
    fn missing_fields_deserialize_to_none() {
        let body: CreateReservationRequest =
            serde_json::from_value(serde_json::json!({})).expect("deserialize");
        assert_eq!(body.cabin_name, None);
        assert_eq!(body.user_email, None);
    }
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::{Date, OffsetDateTime};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::SessionUser;
use crate::cabins;
use crate::calendar::nights_between;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

use super::dto::{
    parse_stay_date, CabinDetails, CabinSummary, CreateReservationRequest,
    CreatedReservationResponse, DeletedReservationResponse, ReservationDetail,
    ReservationDetailResponse, ReservationWithCabin, UpdateReservationRequest,
    UpdatedReservationResponse,
};
use super::repo::{self, NewReservation};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            get(list_reservations).post(create_reservation),
        )
        .route(
            "/reservations/:id",
            get(get_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

fn required(field: Option<String>) -> AppResult<String> {
    field
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("Missing required fields".into()))
}

/// The booking conflict checker: validates the request step by step, then
/// hands the atomic check-and-insert to the repo.
#[instrument(skip(state, body))]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(body): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<CreatedReservationResponse>)> {
    let cabin_name = required(body.cabin_name)?;
    let user_email = required(body.user_email)?;
    let start_raw = required(body.start_date)?;
    let end_raw = required(body.end_date)?;
    let number_of_guests = body
        .number_of_guests
        .ok_or_else(|| AppError::InvalidRequest("Missing required fields".into()))?;
    if number_of_guests < 1 {
        return Err(AppError::InvalidRequest(
            "Number of guests must be at least 1".into(),
        ));
    }

    let cabin = cabins::repo::find_by_name(&state.db, &cabin_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Cabin not found".into()))?;
    if number_of_guests > cabin.guests {
        return Err(AppError::InvalidRequest(format!(
            "Number of guests cannot exceed cabin capacity ({})",
            cabin.guests
        )));
    }

    let start_date = parse_stay_date(&start_raw)
        .ok_or_else(|| AppError::InvalidRequest("Invalid date format".into()))?;
    let end_date = parse_stay_date(&end_raw)
        .ok_or_else(|| AppError::InvalidRequest("Invalid date format".into()))?;

    if start_date >= end_date {
        return Err(AppError::InvalidRequest(
            "End date must be after start date".into(),
        ));
    }
    if start_date < today() {
        return Err(AppError::InvalidRequest(
            "Start date cannot be in the past".into(),
        ));
    }

    // Nights and total are derived here; the client's figures are ignored.
    let number_of_nights = nights_between(start_date, end_date);
    let price_per_night = body.price_per_night.unwrap_or(cabin.price);
    let total_price = number_of_nights * price_per_night;

    let reservation = repo::create(
        &state.db,
        NewReservation {
            cabin_name,
            user_id: body.user_id.unwrap_or_default(),
            user_email,
            start_date,
            end_date,
            number_of_guests,
            number_of_nights,
            price_per_night,
            total_price,
            currency: body
                .currency
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| state.config.currency.clone()),
            special_requests: body.special_requests.filter(|s| !s.is_empty()),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedReservationResponse {
            message: "Reservation created successfully".into(),
            reservation: ReservationWithCabin {
                reservation,
                cabin: Some(CabinSummary::from(cabin)),
            },
        }),
    ))
}

/// The session's reservations, newest first, each joined to its cabin by
/// name. A missing cabin leaves `cabin: null` instead of failing the list.
#[instrument(skip(state, session), fields(email = %session.email))]
pub async fn list_reservations(
    State(state): State<AppState>,
    session: SessionUser,
) -> AppResult<Json<Vec<ReservationWithCabin>>> {
    let reservations = repo::list_by_email(&state.db, &session.email).await?;

    let mut items = Vec::with_capacity(reservations.len());
    for reservation in reservations {
        let cabin = cabins::repo::find_by_name(&state.db, &reservation.cabin_name).await?;
        items.push(ReservationWithCabin {
            reservation,
            cabin: cabin.map(CabinSummary::from),
        });
    }
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReservationDetailResponse>> {
    let reservation = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

    let cabin = cabins::repo::find_by_name(&state.db, &reservation.cabin_name).await?;
    Ok(Json(ReservationDetailResponse {
        reservation: ReservationDetail {
            reservation,
            cabin: cabin.map(CabinDetails::from),
        },
    }))
}

/// Guest-count edit. Dates stay fixed, so no availability re-check; the
/// optional cabin-description edit is a separate operation on the shared
/// cabin row, run only when both the text and the cabin id are supplied.
#[instrument(skip(state, body))]
pub async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateReservationRequest>,
) -> AppResult<Json<UpdatedReservationResponse>> {
    let number_of_guests = body
        .number_of_guests
        .ok_or_else(|| AppError::InvalidRequest("Number of guests is required".into()))?;
    if number_of_guests < 1 {
        return Err(AppError::InvalidRequest(
            "Number of guests must be at least 1".into(),
        ));
    }

    let reservation = repo::update_guest_count(&state.db, id, number_of_guests)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

    if let (Some(description), Some(cabin_id)) =
        (body.cabin_description.as_deref(), body.cabin_id.as_deref())
    {
        cabins::repo::update_description(&state.db, cabin_id, description).await?;
    }

    Ok(Json(UpdatedReservationResponse {
        message: "Reservation updated successfully".into(),
        reservation,
    }))
}

#[instrument(skip(state))]
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletedReservationResponse>> {
    let deleted = repo::delete(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

    Ok(Json(DeletedReservationResponse {
        message: "Reservation deleted successfully".into(),
        id: deleted,
    }))
}

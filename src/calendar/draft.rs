use thiserror::Error;

use super::selection::Selection;
use crate::reservations::dto::CreateReservationRequest;

/// The signed-in guest a submission is made for. Passed in explicitly —
/// there is no ambient session context to consult.
#[derive(Debug, Clone)]
pub struct Guest {
    pub id: String,
    pub email: String,
}

/// Why a draft cannot be submitted yet. Each variant names the missing
/// piece; none of these reach the network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Please select your check-in and check-out dates")]
    DatesNotSelected,
    #[error("Please select the number of guests")]
    GuestsNotSelected,
    #[error("Please log in to make a reservation")]
    NotSignedIn,
}

/// Guest-count choices for a cabin: `1..=capacity`.
pub fn guest_options(capacity: i32) -> Vec<i32> {
    (1..=capacity).collect()
}

/// Everything the widget gathers before the reserve button does anything.
#[derive(Debug, Default)]
pub struct BookingDraft {
    pub selection: Selection,
    pub guests: i32,
    pub special_requests: String,
}

impl BookingDraft {
    /// Turn the draft into the POST payload, or say what is still missing.
    /// Both date bounds, a guest count of at least one, and a session are
    /// required before anything is sent.
    pub fn submission(
        &self,
        guest: Option<&Guest>,
        cabin_name: &str,
        price_per_night: i32,
        currency: &str,
    ) -> Result<CreateReservationRequest, DraftError> {
        let (start, end) = match self.selection {
            Selection::Range { start, end } => (start, end),
            _ => return Err(DraftError::DatesNotSelected),
        };
        if self.guests < 1 {
            return Err(DraftError::GuestsNotSelected);
        }
        let guest = guest.ok_or(DraftError::NotSignedIn)?;

        let nights = super::nights_between(start, end);
        Ok(CreateReservationRequest {
            cabin_name: Some(cabin_name.to_string()),
            user_id: Some(guest.id.clone()),
            user_email: Some(guest.email.clone()),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            number_of_guests: Some(self.guests),
            number_of_nights: Some(nights),
            price_per_night: Some(price_per_night),
            total_price: Some(nights * price_per_night),
            currency: Some(currency.to_string()),
            special_requests: if self.special_requests.is_empty() {
                None
            } else {
                Some(self.special_requests.clone())
            },
        })
    }
}

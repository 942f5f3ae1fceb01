//! Availability calendar: the date-picking half of the booking flow.
//!
//! Everything here is pure state + date arithmetic so a UI (or a test) can
//! drive it without a server round-trip. The server side reuses
//! [`nights_between`] so both halves agree on what a night is.

pub mod draft;
pub mod grid;
pub mod selection;

pub use draft::{guest_options, BookingDraft, DraftError, Guest};
pub use grid::{month_grid, MonthCursor};
pub use selection::{nights_between, Selection};

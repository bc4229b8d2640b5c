use kernel::{model::booking::Booking, service::mentor_activity::MentorActivity};
use serde::Serialize;

use super::booking::BookingResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorActivityResponse {
    pub pending: Vec<BookingResponse>,
    pub confirmed: Vec<BookingResponse>,
    pub completed: Vec<BookingResponse>,
    pub cancelled: Vec<BookingResponse>,
}

impl From<MentorActivity> for MentorActivityResponse {
    fn from(value: MentorActivity) -> Self {
        let MentorActivity {
            pending,
            confirmed,
            completed,
            cancelled,
        } = value;
        let convert = |bookings: Vec<Booking>| -> Vec<BookingResponse> {
            bookings.into_iter().map(BookingResponse::from).collect()
        };
        Self {
            pending: convert(pending),
            confirmed: convert(confirmed),
            completed: convert(completed),
            cancelled: convert(cancelled),
        }
    }
}

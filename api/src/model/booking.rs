use chrono::{NaiveDate, NaiveDateTime};
use garde::Validate;
use kernel::{
    gateway::PaymentHandle,
    model::{
        booking::{Booking, BookingSchedule, BookingStatus, Review, ServiceCategory},
        id::{BookingId, ScheduleId, UserId},
    },
    service::booking_ledger::Reservation,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

use super::time_slot::TimeSlotResponse;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReserveScheduleRequest {
    #[garde(length(max = 4000))]
    pub description: String,
    #[garde(length(min = 1))]
    pub service: String,
}

impl ReserveScheduleRequest {
    pub fn service_category(&self) -> AppResult<ServiceCategory> {
        ServiceCategory::parse(self.service.trim())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransitionBookingRequest {
    #[garde(length(min = 1))]
    pub status: String,
    #[garde(skip)]
    pub reason: Option<String>,
}

impl TransitionBookingRequest {
    pub fn target(&self) -> AppResult<BookingStatus> {
        self.status.trim().parse().map_err(|_| {
            AppError::ValidationError(format!("unknown booking status `{}`", self.status))
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBookingRequest {
    #[garde(range(min = 1, max = 5))]
    pub rating: u8,
    #[garde(length(min = 1, max = 4000))]
    pub comment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub rating: u8,
    pub comment: String,
    pub reviewed_at: NaiveDateTime,
}

impl From<Review> for ReviewResponse {
    fn from(value: Review) -> Self {
        let Review {
            rating,
            comment,
            reviewed_at,
        } = value;
        Self {
            rating,
            comment,
            reviewed_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub schedule_id: ScheduleId,
    pub mentor_id: UserId,
    pub mentee_id: UserId,
    pub date: NaiveDate,
    pub starts_at: NaiveDateTime,
    pub price: Decimal,
    pub slots: Vec<TimeSlotResponse>,
    pub description: String,
    pub service: ServiceCategory,
    pub status: BookingStatus,
    pub cancel_reason: Option<String>,
    pub review: Option<ReviewResponse>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let starts_at = value.schedule.starts_at();
        let Booking {
            booking_id,
            mentee_id,
            description,
            service,
            status,
            cancel_reason,
            review,
            created_at,
            updated_at,
            schedule:
                BookingSchedule {
                    schedule_id,
                    mentor_id,
                    date,
                    price,
                    slots,
                },
        } = value;
        Self {
            booking_id,
            schedule_id,
            mentor_id,
            mentee_id,
            date,
            starts_at,
            price,
            slots: slots.into_iter().map(TimeSlotResponse::from).collect(),
            description,
            service,
            status,
            cancel_reason,
            review: review.map(ReviewResponse::from),
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub booking: BookingResponse,
    pub payment: PaymentHandle,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation { booking, payment } = value;
        Self {
            booking: booking.into(),
            payment,
        }
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use kernel::model::{
    booking::{Booking, BookingSchedule, BookingStatus, Review, ServiceCategory},
    id::{BookingId, ScheduleId, UserId},
    time_slot::TimeSlotCatalog,
};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};

use super::resolve_slots;

// bookings と schedules を結合して読み出す際に使う型
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub mentee_id: UserId,
    pub description: String,
    pub service: String,
    pub status: String,
    pub cancel_reason: Option<String>,
    pub rating: Option<i16>,
    pub review: Option<String>,
    pub reviewed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub schedule_id: ScheduleId,
    pub mentor_id: UserId,
    pub date: NaiveDate,
    pub price: Decimal,
    pub slot_ids: Vec<i32>,
}

impl BookingRow {
    pub fn into_booking(self, catalog: &TimeSlotCatalog) -> AppResult<Booking> {
        let BookingRow {
            booking_id,
            mentee_id,
            description,
            service,
            status,
            cancel_reason,
            rating,
            review,
            reviewed_at,
            created_at,
            updated_at,
            schedule_id,
            mentor_id,
            date,
            price,
            slot_ids,
        } = self;

        let status: BookingStatus = status.parse().map_err(|_| {
            AppError::ConversionEntityError(format!("unknown booking status `{status}`"))
        })?;
        let service: ServiceCategory = service.parse().map_err(|_| {
            AppError::ConversionEntityError(format!("unknown service category `{service}`"))
        })?;

        // rating, review, reviewed_at は揃って存在する
        let review = match (rating, review, reviewed_at) {
            (Some(rating), Some(comment), Some(reviewed_at)) => Some(Review {
                rating: u8::try_from(rating).map_err(|_| {
                    AppError::ConversionEntityError(format!("rating {rating} is out of range"))
                })?,
                comment,
                reviewed_at,
            }),
            _ => None,
        };

        Ok(Booking {
            booking_id,
            mentee_id,
            description,
            service,
            status,
            cancel_reason,
            review,
            created_at,
            updated_at,
            schedule: BookingSchedule {
                schedule_id,
                mentor_id,
                date,
                price,
                slots: resolve_slots(catalog, &slot_ids)?,
            },
        })
    }
}

// 状態遷移の競合判定に使う型
#[derive(sqlx::FromRow)]
pub struct BookingStateRow {
    pub status: String,
    pub rating: Option<i16>,
}

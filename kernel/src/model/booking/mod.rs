use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{Display, EnumString, VariantNames};

use crate::model::{
    id::{BookingId, ScheduleId, UserId},
    time_slot::TimeSlot,
};

pub mod event;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    VariantNames,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    // PENDING -> CONFIRMED -> COMPLETED, PENDING/CONFIRMED -> CANCELLED
    pub fn can_transition_to(self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed)
                | (Confirmed, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
        )
    }

    pub fn ensure_transition(self, to: BookingStatus) -> AppResult<()> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(AppError::InvalidTransitionError {
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }
}

/// Closed set of consultation categories a mentee can book under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    VariantNames,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceCategory {
    Procedures,
    Career,
    Academic,
    Language,
    Lifestyle,
    Other,
}

impl ServiceCategory {
    pub fn parse(tag: &str) -> AppResult<Self> {
        tag.parse().map_err(|_| {
            AppError::ValidationError(format!(
                "unknown service category `{tag}`, expected one of {:?}",
                Self::VARIANTS
            ))
        })
    }
}

// 予約対象スケジュールのスナップショット
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSchedule {
    pub schedule_id: ScheduleId,
    pub mentor_id: UserId,
    pub date: NaiveDate,
    pub price: Decimal,
    pub slots: Vec<TimeSlot>,
}

impl BookingSchedule {
    pub fn starts_at(&self) -> NaiveDateTime {
        let time = self
            .slots
            .iter()
            .map(TimeSlot::start_time)
            .min()
            .unwrap_or_default();
        self.date.and_time(time)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub rating: u8,
    pub comment: String,
    pub reviewed_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub booking_id: BookingId,
    pub mentee_id: UserId,
    pub description: String,
    pub service: ServiceCategory,
    pub status: BookingStatus,
    pub cancel_reason: Option<String>,
    pub review: Option<Review>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub schedule: BookingSchedule,
}

impl Booking {
    pub fn mentor_id(&self) -> UserId {
        self.schedule.mentor_id
    }
}

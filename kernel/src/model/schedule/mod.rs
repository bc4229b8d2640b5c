use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::model::{
    id::{ScheduleId, TimeSlotId, UserId},
    time_slot::TimeSlot,
};

pub mod event;

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub schedule_id: ScheduleId,
    pub mentor_id: UserId,
    pub date: NaiveDate,
    pub price: Decimal,
    // 開始時刻の昇順で保持する
    pub slots: Vec<TimeSlot>,
    pub is_booked: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Schedule {
    pub fn earliest_slot(&self) -> Option<&TimeSlot> {
        self.slots.iter().min_by_key(|s| s.start_hour)
    }

    pub fn earliest_start(&self) -> NaiveDateTime {
        let time = self
            .earliest_slot()
            .map(TimeSlot::start_time)
            .unwrap_or_default();
        self.date.and_time(time)
    }

    pub fn slot_ids(&self) -> Vec<TimeSlotId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.mentor_id == user_id
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use derive_new::new;
use rust_decimal::Decimal;

use crate::model::{
    id::{ScheduleId, TimeSlotId, UserId},
    time_slot::TimeSlot,
};

#[derive(Debug, new)]
pub struct CreateSchedule {
    pub mentor_id: UserId,
    pub date: NaiveDate,
    pub price: Decimal,
    pub slot_ids: Vec<TimeSlotId>,
    pub requested_at: NaiveDateTime,
}

#[derive(Debug, new)]
pub struct UpdateSchedule {
    pub schedule_id: ScheduleId,
    pub requested_user: UserId,
    pub date: NaiveDate,
    pub price: Decimal,
    pub slot_ids: Vec<TimeSlotId>,
    pub requested_at: NaiveDateTime,
}

#[derive(Debug, new)]
pub struct DeleteSchedule {
    pub schedule_id: ScheduleId,
    pub requested_user: UserId,
}

// 検証済みの変更内容。未予約であることの確認はリポジトリ側で原子的に行う
#[derive(Debug, new)]
pub struct ScheduleChanges {
    pub schedule_id: ScheduleId,
    pub date: NaiveDate,
    pub price: Decimal,
    pub slots: Vec<TimeSlot>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct GridCell {
    pub date: NaiveDate,
    pub slot_id: TimeSlotId,
}

// 週間グリッドの一括開閉
#[derive(Debug, new)]
pub struct ToggleGrid {
    pub mentor_id: UserId,
    pub price: Decimal,
    pub open: Vec<GridCell>,
    pub close: Vec<ScheduleId>,
    pub requested_at: NaiveDateTime,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct GridChanges {
    pub created: Vec<ScheduleId>,
    pub deleted: Vec<ScheduleId>,
}

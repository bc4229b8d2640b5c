use chrono::{NaiveDate, NaiveDateTime};
use kernel::model::{
    id::{ScheduleId, UserId},
    schedule::Schedule,
    time_slot::TimeSlotCatalog,
};
use rust_decimal::Decimal;
use shared::error::AppResult;

use super::resolve_slots;

#[derive(sqlx::FromRow)]
pub struct ScheduleRow {
    pub schedule_id: ScheduleId,
    pub mentor_id: UserId,
    pub date: NaiveDate,
    pub price: Decimal,
    pub slot_ids: Vec<i32>,
    pub is_booked: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// 時間枠の解決にカタログが要るため、From ではなく引数をとるメソッドで変換する
impl ScheduleRow {
    pub fn into_schedule(self, catalog: &TimeSlotCatalog) -> AppResult<Schedule> {
        let ScheduleRow {
            schedule_id,
            mentor_id,
            date,
            price,
            slot_ids,
            is_booked,
            created_at,
            updated_at,
        } = self;
        Ok(Schedule {
            schedule_id,
            mentor_id,
            date,
            price,
            slots: resolve_slots(catalog, &slot_ids)?,
            is_booked,
            created_at,
            updated_at,
        })
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{ScheduleId, TimeSlotId, UserId},
    schedule::{
        event::{CreateSchedule, GridCell, GridChanges, ToggleGrid, UpdateSchedule},
        Schedule,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::time_slot::TimeSlotResponse;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub price: Decimal,
    #[garde(length(min = 1))]
    pub slot_ids: Vec<TimeSlotId>,
}

#[derive(new)]
pub struct CreateScheduleRequestWithIds(UserId, NaiveDateTime, CreateScheduleRequest);

impl From<CreateScheduleRequestWithIds> for CreateSchedule {
    fn from(value: CreateScheduleRequestWithIds) -> Self {
        let CreateScheduleRequestWithIds(
            mentor_id,
            requested_at,
            CreateScheduleRequest {
                date,
                price,
                slot_ids,
            },
        ) = value;
        CreateSchedule::new(mentor_id, date, price, slot_ids, requested_at)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub price: Decimal,
    #[garde(length(min = 1))]
    pub slot_ids: Vec<TimeSlotId>,
}

#[derive(new)]
pub struct UpdateScheduleRequestWithIds(ScheduleId, UserId, NaiveDateTime, UpdateScheduleRequest);

impl From<UpdateScheduleRequestWithIds> for UpdateSchedule {
    fn from(value: UpdateScheduleRequestWithIds) -> Self {
        let UpdateScheduleRequestWithIds(
            schedule_id,
            requested_user,
            requested_at,
            UpdateScheduleRequest {
                date,
                price,
                slot_ids,
            },
        ) = value;
        UpdateSchedule::new(schedule_id, requested_user, date, price, slot_ids, requested_at)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCellRequest {
    pub date: NaiveDate,
    pub slot_id: TimeSlotId,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleGridRequest {
    #[garde(skip)]
    pub price: Decimal,
    // 1 週間分 (7 日 x 15 枠) まで
    #[serde(default)]
    #[garde(length(max = 105))]
    pub open: Vec<GridCellRequest>,
    #[serde(default)]
    #[garde(length(max = 105))]
    pub close: Vec<ScheduleId>,
}

#[derive(new)]
pub struct ToggleGridRequestWithIds(UserId, NaiveDateTime, ToggleGridRequest);

impl From<ToggleGridRequestWithIds> for ToggleGrid {
    fn from(value: ToggleGridRequestWithIds) -> Self {
        let ToggleGridRequestWithIds(
            mentor_id,
            requested_at,
            ToggleGridRequest { price, open, close },
        ) = value;
        ToggleGrid::new(
            mentor_id,
            price,
            open.into_iter()
                .map(|cell| GridCell::new(cell.date, cell.slot_id))
                .collect(),
            close,
            requested_at,
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub schedule_id: ScheduleId,
    pub mentor_id: UserId,
    pub date: NaiveDate,
    pub price: Decimal,
    pub slots: Vec<TimeSlotResponse>,
    pub starts_at: NaiveDateTime,
    pub is_booked: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Schedule> for ScheduleResponse {
    fn from(value: Schedule) -> Self {
        let starts_at = value.earliest_start();
        let Schedule {
            schedule_id,
            mentor_id,
            date,
            price,
            slots,
            is_booked,
            created_at,
            updated_at,
        } = value;
        Self {
            schedule_id,
            mentor_id,
            date,
            price,
            slots: slots.into_iter().map(TimeSlotResponse::from).collect(),
            starts_at,
            is_booked,
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulesResponse {
    pub items: Vec<ScheduleResponse>,
}

impl From<Vec<Schedule>> for SchedulesResponse {
    fn from(value: Vec<Schedule>) -> Self {
        Self {
            items: value.into_iter().map(ScheduleResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridChangesResponse {
    pub created: Vec<ScheduleId>,
    pub deleted: Vec<ScheduleId>,
}

impl From<GridChanges> for GridChangesResponse {
    fn from(value: GridChanges) -> Self {
        let GridChanges { created, deleted } = value;
        Self { created, deleted }
    }
}

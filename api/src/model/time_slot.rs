use kernel::model::{id::TimeSlotId, time_slot::TimeSlot};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotResponse {
    pub id: TimeSlotId,
    pub start_hour: u32,
    pub end_hour: u32,
    pub label: String,
}

impl From<TimeSlot> for TimeSlotResponse {
    fn from(value: TimeSlot) -> Self {
        let TimeSlot {
            id,
            start_hour,
            end_hour,
        } = value;
        Self {
            id,
            start_hour,
            end_hour,
            label: format!("{start_hour:02}:00-{end_hour:02}:00"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotsResponse {
    pub items: Vec<TimeSlotResponse>,
}

impl From<Vec<TimeSlot>> for TimeSlotsResponse {
    fn from(value: Vec<TimeSlot>) -> Self {
        Self {
            items: value.into_iter().map(TimeSlotResponse::from).collect(),
        }
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use garde::Validate;
use kernel::{model::id::UserId, service::availability::AvailableDay};
use serde::{Deserialize, Serialize};

use super::schedule::ScheduleResponse;

pub const DEFAULT_HORIZON_DAYS: u32 = 14;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    #[garde(skip)]
    pub as_of: Option<NaiveDateTime>,
    #[garde(range(min = 1, max = 90))]
    pub horizon_days: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDayResponse {
    pub date: NaiveDate,
    pub schedules: Vec<ScheduleResponse>,
}

impl From<AvailableDay> for AvailableDayResponse {
    fn from(value: AvailableDay) -> Self {
        let AvailableDay { date, schedules } = value;
        Self {
            date,
            schedules: schedules.into_iter().map(ScheduleResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub mentor_id: UserId,
    pub as_of: NaiveDateTime,
    pub horizon_days: u32,
    pub lead_time_hours: i64,
    pub days: Vec<AvailableDayResponse>,
}

use std::sync::Arc;

use chrono::{Days, Duration, NaiveDate, NaiveDateTime};
use derive_new::new;
use shared::error::AppResult;

use crate::{
    model::{id::UserId, schedule::Schedule},
    repository::schedule::ScheduleRepository,
};

#[derive(Debug, Clone, PartialEq)]
pub struct AvailableDay {
    pub date: NaiveDate,
    pub schedules: Vec<Schedule>,
}

#[derive(new)]
pub struct AvailabilityFilter {
    repository: Arc<dyn ScheduleRepository>,
    lead_time: Duration,
}

impl AvailabilityFilter {
    pub fn lead_time(&self) -> Duration {
        self.lead_time
    }

    /// Schedules a mentee may book right now, grouped by date in ascending order.
    pub async fn list_eligible(
        &self,
        mentor_id: UserId,
        as_of: NaiveDateTime,
        horizon_days: u32,
    ) -> AppResult<Vec<AvailableDay>> {
        let today = as_of.date();
        let until = horizon_end(today, horizon_days);
        let schedules = self
            .repository
            .find_by_mentor_between(mentor_id, today, until)
            .await?;

        Ok(select_eligible(schedules, as_of, horizon_days, self.lead_time))
    }
}

pub fn select_eligible(
    schedules: Vec<Schedule>,
    as_of: NaiveDateTime,
    horizon_days: u32,
    lead_time: Duration,
) -> Vec<AvailableDay> {
    let today = as_of.date();
    let until = horizon_end(today, horizon_days);
    let earliest_allowed = as_of + lead_time;

    let mut eligible: Vec<Schedule> = schedules
        .into_iter()
        .filter(|s| s.date >= today && s.date < until)
        .filter(|s| !s.is_booked)
        // 当日分だけリードタイムを適用する。翌日以降は対象外
        .filter(|s| s.date != today || s.earliest_start() >= earliest_allowed)
        .collect();
    eligible.sort_by_key(|s| (s.date, s.earliest_start(), s.schedule_id));

    let mut days: Vec<AvailableDay> = Vec::new();
    for schedule in eligible {
        match days.last_mut() {
            Some(day) if day.date == schedule.date => day.schedules.push(schedule),
            _ => days.push(AvailableDay {
                date: schedule.date,
                schedules: vec![schedule],
            }),
        }
    }
    days
}

// 日付の範囲を超える期間は上限で打ち切る
fn horizon_end(today: NaiveDate, horizon_days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(horizon_days)))
        .unwrap_or(NaiveDate::MAX)
}

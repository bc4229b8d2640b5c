use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use kernel::model::{
    id::{ScheduleId, UserId},
    schedule::{event::ScheduleChanges, Schedule},
};
use kernel::repository::schedule::ScheduleRepository;
use parking_lot::Mutex;
use shared::error::{AppError, AppResult};

use super::MemoryStore;

fn booked_conflict() -> AppError {
    AppError::ConflictError("cannot modify a booked schedule".into())
}

fn not_found(schedule_id: ScheduleId) -> AppError {
    AppError::EntityNotFound(format!("schedule {schedule_id} not found"))
}

impl MemoryStore {
    fn insert_schedule(&self, schedule: Schedule) -> AppResult<()> {
        let mut schedules = self.schedules.write();
        if schedules.contains_key(&schedule.schedule_id) {
            return Err(AppError::ConflictError(format!(
                "schedule {} already exists",
                schedule.schedule_id
            )));
        }
        schedules.insert(schedule.schedule_id, Arc::new(Mutex::new(schedule)));
        Ok(())
    }

    fn update_schedule(&self, changes: ScheduleChanges) -> AppResult<Schedule> {
        let schedules = self.schedules.read();
        let entry = schedules
            .get(&changes.schedule_id)
            .ok_or_else(|| not_found(changes.schedule_id))?;

        let mut schedule = entry.lock();
        if schedule.is_booked {
            return Err(booked_conflict());
        }
        schedule.date = changes.date;
        schedule.price = changes.price;
        schedule.slots = changes.slots;
        schedule.updated_at = changes.updated_at;
        Ok(schedule.clone())
    }

    fn delete_schedule(&self, schedule_id: ScheduleId) -> AppResult<()> {
        let mut schedules = self.schedules.write();
        {
            let entry = schedules.get(&schedule_id).ok_or_else(|| not_found(schedule_id))?;
            if entry.lock().is_booked {
                return Err(booked_conflict());
            }
        }
        schedules.remove(&schedule_id);
        // キャンセル済みの予約も一緒に消える
        self.bookings
            .write()
            .retain(|_, b| b.schedule_id != schedule_id);
        Ok(())
    }

    fn select_schedules(&self, pred: impl Fn(&Schedule) -> bool) -> Vec<Schedule> {
        let mut found: Vec<Schedule> = self
            .schedules
            .read()
            .values()
            .map(|entry| entry.lock().clone())
            .filter(|s| pred(s))
            .collect();
        found.sort_by_key(|s| (s.date, s.created_at, s.schedule_id));
        found
    }
}

#[async_trait]
impl ScheduleRepository for MemoryStore {
    async fn insert(&self, schedule: Schedule) -> AppResult<()> {
        self.insert_schedule(schedule)
    }

    async fn update(&self, changes: ScheduleChanges) -> AppResult<Schedule> {
        self.update_schedule(changes)
    }

    async fn delete(&self, schedule_id: ScheduleId) -> AppResult<()> {
        self.delete_schedule(schedule_id)
    }

    async fn find_by_id(&self, schedule_id: ScheduleId) -> AppResult<Option<Schedule>> {
        let schedules = self.schedules.read();
        Ok(schedules.get(&schedule_id).map(|entry| entry.lock().clone()))
    }

    async fn find_by_mentor(&self, mentor_id: UserId) -> AppResult<Vec<Schedule>> {
        Ok(self.select_schedules(|s| s.mentor_id == mentor_id))
    }

    async fn find_by_mentor_between(
        &self,
        mentor_id: UserId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<Schedule>> {
        Ok(self.select_schedules(|s| s.mentor_id == mentor_id && s.date >= from && s.date < until))
    }
}

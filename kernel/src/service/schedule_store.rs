use std::{collections::HashSet, sync::Arc};

use chrono::NaiveDate;
use derive_new::new;
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};

use crate::{
    model::{
        id::{ScheduleId, TimeSlotId, UserId},
        schedule::{
            event::{
                CreateSchedule, DeleteSchedule, GridChanges, ScheduleChanges, ToggleGrid,
                UpdateSchedule,
            },
            Schedule,
        },
        time_slot::{TimeSlot, TimeSlotCatalog},
    },
    repository::schedule::ScheduleRepository,
};

#[derive(new)]
pub struct ScheduleStore {
    catalog: Arc<TimeSlotCatalog>,
    repository: Arc<dyn ScheduleRepository>,
}

impl ScheduleStore {
    pub fn catalog(&self) -> &TimeSlotCatalog {
        &self.catalog
    }

    pub async fn create(&self, event: CreateSchedule) -> AppResult<Schedule> {
        let today = event.requested_at.date();
        let slots = self.validate(event.date, event.price, &event.slot_ids, today)?;

        let schedule = Schedule {
            schedule_id: ScheduleId::new(),
            mentor_id: event.mentor_id,
            date: event.date,
            price: event.price,
            slots,
            is_booked: false,
            created_at: event.requested_at,
            updated_at: event.requested_at,
        };
        self.repository.insert(schedule.clone()).await?;

        tracing::info!(
            schedule_id = %schedule.schedule_id,
            mentor_id = %schedule.mentor_id,
            date = %schedule.date,
            "schedule created"
        );
        Ok(schedule)
    }

    pub async fn update(&self, event: UpdateSchedule) -> AppResult<Schedule> {
        let today = event.requested_at.date();
        let slots = self.validate(event.date, event.price, &event.slot_ids, today)?;

        let current = self.get_by_id(event.schedule_id).await?;
        ensure_owner(&current, event.requested_user)?;
        ensure_not_booked(&current)?;

        // 予約との競合はリポジトリの条件付き更新で最終的に判定される
        self.repository
            .update(ScheduleChanges::new(
                event.schedule_id,
                event.date,
                event.price,
                slots,
                event.requested_at,
            ))
            .await
    }

    pub async fn delete(&self, event: DeleteSchedule) -> AppResult<()> {
        let current = self.get_by_id(event.schedule_id).await?;
        ensure_owner(&current, event.requested_user)?;
        ensure_not_booked(&current)?;

        self.repository.delete(event.schedule_id).await?;
        tracing::info!(schedule_id = %event.schedule_id, "schedule deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, schedule_id: ScheduleId) -> AppResult<Schedule> {
        self.repository
            .find_by_id(schedule_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound(format!("schedule {schedule_id} not found")))
    }

    pub async fn get_by_mentor(&self, mentor_id: UserId) -> AppResult<Vec<Schedule>> {
        let mut schedules = self.repository.find_by_mentor(mentor_id).await?;
        schedules.sort_by_key(|s| (s.earliest_start(), s.schedule_id));
        Ok(schedules)
    }

    // バッチ全体を先に検証してから、閉じたものを削除し、開いたセルごとに単一枠のスケジュールを作成する
    pub async fn toggle_grid(&self, event: ToggleGrid) -> AppResult<GridChanges> {
        let today = event.requested_at.date();
        let mut cells = HashSet::with_capacity(event.open.len());
        let mut opened = Vec::with_capacity(event.open.len());
        for cell in &event.open {
            if !cells.insert(*cell) {
                return Err(AppError::ValidationError(format!(
                    "cell {} / slot {} is opened more than once",
                    cell.date, cell.slot_id
                )));
            }
            let slots = self.validate(cell.date, event.price, &[cell.slot_id], today)?;
            opened.push((cell.date, slots));
        }

        let mut closing: Vec<Schedule> = Vec::with_capacity(event.close.len());
        for schedule_id in &event.close {
            if closing.iter().any(|s| s.schedule_id == *schedule_id) {
                return Err(AppError::ValidationError(format!(
                    "schedule {schedule_id} is closed more than once"
                )));
            }
            let current = self.get_by_id(*schedule_id).await?;
            ensure_owner(&current, event.mentor_id)?;
            ensure_not_booked(&current)?;
            closing.push(current);
        }

        let mut changes = GridChanges::default();
        if let Err(e) = self.apply_grid(&event, &closing, opened, &mut changes).await {
            tracing::warn!(
                mentor_id = %event.mentor_id,
                error.message = %e,
                "schedule grid toggle failed, reverting applied changes"
            );
            self.revert_grid(&closing, &changes).await;
            return Err(e);
        }

        tracing::info!(
            mentor_id = %event.mentor_id,
            created = changes.created.len(),
            deleted = changes.deleted.len(),
            "schedule grid toggled"
        );
        Ok(changes)
    }

    // 削除はリポジトリの条件付き削除で行うため、検証後に予約された枠はここで失敗する
    async fn apply_grid(
        &self,
        event: &ToggleGrid,
        closing: &[Schedule],
        opened: Vec<(NaiveDate, Vec<TimeSlot>)>,
        changes: &mut GridChanges,
    ) -> AppResult<()> {
        for schedule in closing {
            self.repository.delete(schedule.schedule_id).await?;
            changes.deleted.push(schedule.schedule_id);
        }
        for (date, slots) in opened {
            let schedule = Schedule {
                schedule_id: ScheduleId::new(),
                mentor_id: event.mentor_id,
                date,
                price: event.price,
                slots,
                is_booked: false,
                created_at: event.requested_at,
                updated_at: event.requested_at,
            };
            let schedule_id = schedule.schedule_id;
            self.repository.insert(schedule).await?;
            changes.created.push(schedule_id);
        }
        Ok(())
    }

    async fn revert_grid(&self, closing: &[Schedule], changes: &GridChanges) {
        for schedule_id in &changes.created {
            if let Err(e) = self.repository.delete(*schedule_id).await {
                tracing::error!(
                    schedule_id = %schedule_id,
                    error.cause_chain = ?e,
                    "failed to remove a schedule opened by a failed grid toggle"
                );
            }
        }
        for schedule in closing
            .iter()
            .filter(|s| changes.deleted.contains(&s.schedule_id))
        {
            if let Err(e) = self.repository.insert(schedule.clone()).await {
                tracing::error!(
                    schedule_id = %schedule.schedule_id,
                    error.cause_chain = ?e,
                    "failed to restore a schedule closed by a failed grid toggle"
                );
            }
        }
    }

    fn validate(
        &self,
        date: NaiveDate,
        price: Decimal,
        slot_ids: &[TimeSlotId],
        today: NaiveDate,
    ) -> AppResult<Vec<TimeSlot>> {
        if date < today {
            return Err(AppError::ValidationError(format!(
                "schedule date {date} is in the past"
            )));
        }
        if price <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "price must be greater than zero".into(),
            ));
        }
        self.catalog.resolve(slot_ids)
    }
}

fn ensure_owner(schedule: &Schedule, user_id: UserId) -> AppResult<()> {
    if schedule.is_owned_by(user_id) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(format!(
            "schedule {} belongs to another mentor",
            schedule.schedule_id
        )))
    }
}

fn ensure_not_booked(schedule: &Schedule) -> AppResult<()> {
    if schedule.is_booked {
        Err(AppError::ConflictError(
            "cannot modify a booked schedule".into(),
        ))
    } else {
        Ok(())
    }
}

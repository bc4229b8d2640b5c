use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_new::new;
use kernel::model::{
    id::{ScheduleId, UserId},
    schedule::{event::ScheduleChanges, Schedule},
    time_slot::TimeSlotCatalog,
};
use kernel::repository::schedule::ScheduleRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{schedule::ScheduleRow, slot_id_column},
    ConnectionPool,
};

const SELECT_SCHEDULE: &str = r#"
    SELECT
        schedule_id,
        mentor_id,
        date,
        price,
        slot_ids,
        is_booked,
        created_at,
        updated_at
    FROM schedules
"#;

#[derive(new)]
pub struct ScheduleRepositoryImpl {
    db: ConnectionPool,
    catalog: Arc<TimeSlotCatalog>,
}

#[async_trait]
impl ScheduleRepository for ScheduleRepositoryImpl {
    async fn insert(&self, schedule: Schedule) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                INSERT INTO schedules
                (schedule_id, mentor_id, date, price, slot_ids, is_booked, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(schedule.schedule_id)
        .bind(schedule.mentor_id)
        .bind(schedule.date)
        .bind(schedule.price)
        .bind(slot_id_column(&schedule.slots))
        .bind(schedule.is_booked)
        .bind(schedule.created_at)
        .bind(schedule.updated_at)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No schedule record has been created".into(),
            ));
        }
        Ok(())
    }

    async fn update(&self, changes: ScheduleChanges) -> AppResult<Schedule> {
        // is_booked = FALSE を条件に含めることで、予約との競合を一文で判定する
        let row: Option<ScheduleRow> = sqlx::query_as(
            r#"
                UPDATE schedules
                SET date = $2, price = $3, slot_ids = $4, updated_at = $5
                WHERE schedule_id = $1 AND is_booked = FALSE
                RETURNING
                    schedule_id, mentor_id, date, price, slot_ids,
                    is_booked, created_at, updated_at
            "#,
        )
        .bind(changes.schedule_id)
        .bind(changes.date)
        .bind(changes.price)
        .bind(slot_id_column(&changes.slots))
        .bind(changes.updated_at)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            Some(row) => row.into_schedule(&self.catalog),
            None => Err(self.explain_unchanged(changes.schedule_id).await),
        }
    }

    async fn delete(&self, schedule_id: ScheduleId) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                DELETE FROM schedules
                WHERE schedule_id = $1 AND is_booked = FALSE
            "#,
        )
        .bind(schedule_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(self.explain_unchanged(schedule_id).await);
        }
        Ok(())
    }

    async fn find_by_id(&self, schedule_id: ScheduleId) -> AppResult<Option<Schedule>> {
        let row: Option<ScheduleRow> =
            sqlx::query_as(&format!("{SELECT_SCHEDULE} WHERE schedule_id = $1"))
                .bind(schedule_id)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        row.map(|r| r.into_schedule(&self.catalog)).transpose()
    }

    async fn find_by_mentor(&self, mentor_id: UserId) -> AppResult<Vec<Schedule>> {
        let rows: Vec<ScheduleRow> = sqlx::query_as(&format!(
            "{SELECT_SCHEDULE} WHERE mentor_id = $1 ORDER BY date ASC, created_at ASC"
        ))
        .bind(mentor_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter()
            .map(|r| r.into_schedule(&self.catalog))
            .collect()
    }

    async fn find_by_mentor_between(
        &self,
        mentor_id: UserId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<Schedule>> {
        let rows: Vec<ScheduleRow> = sqlx::query_as(&format!(
            "{SELECT_SCHEDULE} WHERE mentor_id = $1 AND date >= $2 AND date < $3 ORDER BY date ASC"
        ))
        .bind(mentor_id)
        .bind(from)
        .bind(until)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter()
            .map(|r| r.into_schedule(&self.catalog))
            .collect()
    }
}

impl ScheduleRepositoryImpl {
    // 条件付き更新・削除が 0 件だった理由を調べる
    async fn explain_unchanged(&self, schedule_id: ScheduleId) -> AppError {
        let booked: Result<Option<bool>, sqlx::Error> =
            sqlx::query_scalar("SELECT is_booked FROM schedules WHERE schedule_id = $1")
                .bind(schedule_id)
                .fetch_optional(self.db.inner_ref())
                .await;

        match booked {
            Ok(Some(true)) => AppError::ConflictError("cannot modify a booked schedule".into()),
            Ok(Some(false)) => AppError::NoRowsAffectedError(format!(
                "schedule {schedule_id} was not modified"
            )),
            Ok(None) => AppError::EntityNotFound(format!("schedule {schedule_id} not found")),
            Err(e) => AppError::SpecificOperationError(e),
        }
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

use crate::model::{
    id::{ScheduleId, UserId},
    schedule::{event::ScheduleChanges, Schedule},
};

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    // スケジュールを登録する
    async fn insert(&self, schedule: Schedule) -> AppResult<()>;
    // 未予約の場合に限り内容を更新する。予約済みなら ConflictError
    async fn update(&self, changes: ScheduleChanges) -> AppResult<Schedule>;
    // 未予約の場合に限り削除する。予約済みなら ConflictError
    async fn delete(&self, schedule_id: ScheduleId) -> AppResult<()>;
    async fn find_by_id(&self, schedule_id: ScheduleId) -> AppResult<Option<Schedule>>;
    // メンターの全スケジュールを日付順で取得する
    async fn find_by_mentor(&self, mentor_id: UserId) -> AppResult<Vec<Schedule>>;
    // [from, until) の範囲の日付をもつスケジュールを取得する
    async fn find_by_mentor_between(
        &self,
        mentor_id: UserId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<Schedule>>;
}

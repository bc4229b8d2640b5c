mod common;

use std::sync::Arc;

use adapter::memory::MemoryStore;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use common::{mentor, now, price, today, tomorrow, Harness};
use kernel::{
    model::{
        id::{ScheduleId, TimeSlotId, UserId},
        schedule::{
            event::{
                CreateSchedule, DeleteSchedule, GridCell, ScheduleChanges, ToggleGrid,
                UpdateSchedule,
            },
            Schedule,
        },
        time_slot::TimeSlotCatalog,
    },
    repository::schedule::ScheduleRepository,
    service::schedule_store::ScheduleStore,
};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};

fn slots(ids: &[i32]) -> Vec<TimeSlotId> {
    ids.iter().copied().map(TimeSlotId::new).collect()
}

#[tokio::test]
async fn create_rejects_malformed_schedules() {
    let h = Harness::new();
    let store = h.registry.schedule_store();
    let m = UserId::new();
    let yesterday = today().pred_opt().unwrap();

    let cases = [
        CreateSchedule::new(m, yesterday, price(1), slots(&[2]), now()),
        CreateSchedule::new(m, tomorrow(), Decimal::ZERO, slots(&[2]), now()),
        CreateSchedule::new(m, tomorrow(), price(-5), slots(&[2]), now()),
        CreateSchedule::new(m, tomorrow(), price(1), slots(&[]), now()),
        CreateSchedule::new(m, tomorrow(), price(1), slots(&[99]), now()),
        CreateSchedule::new(m, tomorrow(), price(1), slots(&[2, 2]), now()),
    ];
    for event in cases {
        let res = store.create(event).await;
        assert!(matches!(res, Err(AppError::ValidationError(_))), "{res:?}");
    }
    assert!(store.get_by_mentor(m).await.unwrap().is_empty());
}

#[tokio::test]
async fn today_is_a_valid_schedule_date() {
    let h = Harness::new();
    let created = h.open_schedule(UserId::new(), today(), &[10]).await;
    assert_eq!(created.date, today());
    assert!(!created.is_booked);
}

#[tokio::test]
async fn slots_are_stored_in_start_order() {
    let h = Harness::new();
    let created = h.open_schedule(UserId::new(), tomorrow(), &[5, 1, 3]).await;
    let hours: Vec<_> = created.slots.iter().map(|s| s.start_hour).collect();
    assert_eq!(hours, vec![8, 10, 12]);
    assert_eq!(created.earliest_start(), tomorrow().and_hms_opt(8, 0, 0).unwrap());
}

#[tokio::test]
async fn update_checks_ownership_and_booking() {
    let h = Harness::new();
    let store = h.registry.schedule_store();
    let (m, other, a) = (UserId::new(), UserId::new(), UserId::new());
    let s = h.open_schedule(m, tomorrow(), &[2]).await;
    let day_after = tomorrow() + Duration::days(1);

    let res = store
        .update(UpdateSchedule::new(s.schedule_id, other, day_after, price(1), slots(&[3]), now()))
        .await;
    assert!(matches!(res, Err(AppError::AuthorizationError(_))));

    let updated = store
        .update(UpdateSchedule::new(
            s.schedule_id,
            m,
            day_after,
            price(750_000),
            slots(&[3, 4]),
            now(),
        ))
        .await
        .unwrap();
    assert_eq!(updated.date, day_after);
    assert_eq!(updated.price, price(750_000));
    assert_eq!(updated.slot_ids(), slots(&[3, 4]));
    assert_eq!(store.get_by_id(s.schedule_id).await.unwrap(), updated);

    h.reserve(s.schedule_id, a).await.unwrap();
    let res = store
        .update(UpdateSchedule::new(s.schedule_id, m, day_after, price(1), slots(&[3]), now()))
        .await;
    assert!(matches!(res, Err(AppError::ConflictError(_))));

    let res = store
        .update(UpdateSchedule::new(ScheduleId::new(), m, day_after, price(1), slots(&[3]), now()))
        .await;
    assert!(matches!(res, Err(AppError::EntityNotFound(_))));
}

#[tokio::test]
async fn delete_checks_ownership_and_booking() {
    let h = Harness::new();
    let store = h.registry.schedule_store();
    let (m, other, a) = (UserId::new(), UserId::new(), UserId::new());
    let free = h.open_schedule(m, tomorrow(), &[2]).await;
    let booked = h.open_schedule(m, tomorrow(), &[3]).await;
    h.reserve(booked.schedule_id, a).await.unwrap();

    let res = store.delete(DeleteSchedule::new(free.schedule_id, other)).await;
    assert!(matches!(res, Err(AppError::AuthorizationError(_))));

    let res = store.delete(DeleteSchedule::new(booked.schedule_id, m)).await;
    assert!(matches!(res, Err(AppError::ConflictError(_))));

    store.delete(DeleteSchedule::new(free.schedule_id, m)).await.unwrap();
    assert!(matches!(
        store.get_by_id(free.schedule_id).await,
        Err(AppError::EntityNotFound(_))
    ));
}

#[tokio::test]
async fn deleting_a_freed_schedule_drops_its_cancelled_bookings() {
    let h = Harness::new();
    let (m, a) = (UserId::new(), UserId::new());
    let s = h.open_schedule(m, tomorrow(), &[2]).await;
    let b = h.reserve(s.schedule_id, a).await.unwrap();
    h.transition(
        b.booking_id,
        mentor(m),
        kernel::model::booking::BookingStatus::Cancelled,
        Some("Travelling"),
    )
    .await
    .unwrap();

    h.registry
        .schedule_store()
        .delete(DeleteSchedule::new(s.schedule_id, m))
        .await
        .unwrap();

    assert!(h
        .registry
        .booking_ledger()
        .list_for_mentee(a)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn mentor_schedules_are_ordered_by_start() {
    let h = Harness::new();
    let m = UserId::new();
    let later = h.open_schedule(m, tomorrow(), &[10]).await;
    let earlier = h.open_schedule(m, tomorrow(), &[1]).await;
    let first = h.open_schedule(m, today(), &[15]).await;
    h.open_schedule(UserId::new(), today(), &[15]).await;

    let ids: Vec<_> = h
        .registry
        .schedule_store()
        .get_by_mentor(m)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.schedule_id)
        .collect();
    assert_eq!(ids, vec![first.schedule_id, earlier.schedule_id, later.schedule_id]);
}

#[tokio::test]
async fn grid_toggle_opens_and_closes_cells() {
    let h = Harness::new();
    let store = h.registry.schedule_store();
    let m = UserId::new();
    let closing = h.open_schedule(m, tomorrow(), &[2]).await;

    let changes = store
        .toggle_grid(ToggleGrid::new(
            m,
            price(400_000),
            vec![
                GridCell::new(tomorrow(), TimeSlotId::new(3)),
                GridCell::new(tomorrow(), TimeSlotId::new(4)),
            ],
            vec![closing.schedule_id],
            now(),
        ))
        .await
        .unwrap();

    assert_eq!(changes.deleted, vec![closing.schedule_id]);
    assert_eq!(changes.created.len(), 2);
    let remaining = store.get_by_mentor(m).await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining
        .iter()
        .all(|s| s.slots.len() == 1 && s.price == price(400_000)));
}

#[tokio::test]
async fn grid_toggle_is_validated_as_a_whole() {
    let h = Harness::new();
    let store = h.registry.schedule_store();
    let (m, a) = (UserId::new(), UserId::new());
    let booked = h.open_schedule(m, tomorrow(), &[2]).await;
    h.reserve(booked.schedule_id, a).await.unwrap();
    let free = h.open_schedule(m, tomorrow(), &[5]).await;

    let res = store
        .toggle_grid(ToggleGrid::new(
            m,
            price(400_000),
            vec![GridCell::new(tomorrow(), TimeSlotId::new(3))],
            vec![free.schedule_id, booked.schedule_id],
            now(),
        ))
        .await;
    assert!(matches!(res, Err(AppError::ConflictError(_))));

    let res = store
        .toggle_grid(ToggleGrid::new(
            m,
            price(400_000),
            vec![
                GridCell::new(tomorrow(), TimeSlotId::new(3)),
                GridCell::new(tomorrow(), TimeSlotId::new(42)),
            ],
            vec![free.schedule_id],
            now(),
        ))
        .await;
    assert!(matches!(res, Err(AppError::ValidationError(_))));

    // どちらの失敗でも何も変わっていない
    let ids: Vec<_> = store
        .get_by_mentor(m)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.schedule_id)
        .collect();
    assert_eq!(ids, vec![booked.schedule_id, free.schedule_id]);
}

#[tokio::test]
async fn grid_toggle_rejects_repeated_cells_and_ids() {
    let h = Harness::new();
    let store = h.registry.schedule_store();
    let m = UserId::new();
    let s1 = h.open_schedule(m, tomorrow(), &[2]).await;
    let s2 = h.open_schedule(m, tomorrow(), &[5]).await;

    let res = store
        .toggle_grid(ToggleGrid::new(
            m,
            price(400_000),
            vec![GridCell::new(tomorrow(), TimeSlotId::new(3))],
            vec![s1.schedule_id, s2.schedule_id, s1.schedule_id],
            now(),
        ))
        .await;
    assert!(matches!(res, Err(AppError::ValidationError(_))));

    let res = store
        .toggle_grid(ToggleGrid::new(
            m,
            price(400_000),
            vec![
                GridCell::new(tomorrow(), TimeSlotId::new(3)),
                GridCell::new(tomorrow(), TimeSlotId::new(3)),
            ],
            vec![s1.schedule_id],
            now(),
        ))
        .await;
    assert!(matches!(res, Err(AppError::ValidationError(_))));

    let ids: Vec<_> = store
        .get_by_mentor(m)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.schedule_id)
        .collect();
    assert_eq!(ids, vec![s1.schedule_id, s2.schedule_id]);
}

// 検証後に予約された枠を模して、特定のスケジュールの削除だけを拒否する
struct ReservedAfterCheck {
    inner: Arc<MemoryStore>,
    reserved: ScheduleId,
}

#[async_trait]
impl ScheduleRepository for ReservedAfterCheck {
    async fn insert(&self, schedule: Schedule) -> AppResult<()> {
        ScheduleRepository::insert(&*self.inner, schedule).await
    }

    async fn update(&self, changes: ScheduleChanges) -> AppResult<Schedule> {
        ScheduleRepository::update(&*self.inner, changes).await
    }

    async fn delete(&self, schedule_id: ScheduleId) -> AppResult<()> {
        if schedule_id == self.reserved {
            return Err(AppError::ConflictError("schedule was booked".into()));
        }
        ScheduleRepository::delete(&*self.inner, schedule_id).await
    }

    async fn find_by_id(&self, schedule_id: ScheduleId) -> AppResult<Option<Schedule>> {
        ScheduleRepository::find_by_id(&*self.inner, schedule_id).await
    }

    async fn find_by_mentor(&self, mentor_id: UserId) -> AppResult<Vec<Schedule>> {
        ScheduleRepository::find_by_mentor(&*self.inner, mentor_id).await
    }

    async fn find_by_mentor_between(
        &self,
        mentor_id: UserId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<Schedule>> {
        ScheduleRepository::find_by_mentor_between(&*self.inner, mentor_id, from, until).await
    }
}

#[tokio::test]
async fn grid_toggle_reverts_deletes_when_a_later_step_fails() {
    let memory = Arc::new(MemoryStore::new());
    let plain = ScheduleStore::new(Arc::new(TimeSlotCatalog::standard()), memory.clone());
    let m = UserId::new();
    let s1 = plain
        .create(CreateSchedule::new(m, tomorrow(), price(500_000), slots(&[2]), now()))
        .await
        .unwrap();
    let s2 = plain
        .create(CreateSchedule::new(m, tomorrow(), price(500_000), slots(&[5]), now()))
        .await
        .unwrap();

    let store = ScheduleStore::new(
        Arc::new(TimeSlotCatalog::standard()),
        Arc::new(ReservedAfterCheck {
            inner: memory.clone(),
            reserved: s2.schedule_id,
        }),
    );
    let res = store
        .toggle_grid(ToggleGrid::new(
            m,
            price(400_000),
            vec![GridCell::new(tomorrow(), TimeSlotId::new(3))],
            vec![s1.schedule_id, s2.schedule_id],
            now(),
        ))
        .await;
    assert!(matches!(res, Err(AppError::ConflictError(_))));

    // 先に削除された s1 は元に戻り、新しいセルは作られていない
    let remaining = plain.get_by_mentor(m).await.unwrap();
    assert_eq!(remaining, vec![s1, s2]);
}

mod common;

use common::{mentee, mentor, tomorrow, Harness};
use kernel::model::{booking::BookingStatus, id::UserId};

#[tokio::test]
async fn bookings_are_grouped_by_status_most_recent_first() {
    let h = Harness::new();
    let (m, a) = (UserId::new(), UserId::new());
    let day_after = tomorrow().succ_opt().unwrap();

    let mut booking_ids = Vec::new();
    for (date, slot) in [(tomorrow(), 2), (tomorrow(), 6), (day_after, 1), (day_after, 4)] {
        let s = h.open_schedule(m, date, &[slot]).await;
        booking_ids.push(h.reserve(s.schedule_id, a).await.unwrap().booking_id);
    }
    let cancelled = {
        let s = h.open_schedule(m, tomorrow(), &[9]).await;
        h.reserve(s.schedule_id, a).await.unwrap().booking_id
    };
    h.transition(cancelled, mentee(a), BookingStatus::Cancelled, Some("Exam week"))
        .await
        .unwrap();
    h.transition(booking_ids[0], mentor(m), BookingStatus::Confirmed, None)
        .await
        .unwrap();

    // 他のメンターの予約は混ざらない
    let other = h.open_schedule(UserId::new(), tomorrow(), &[2]).await;
    h.reserve(other.schedule_id, a).await.unwrap();

    let activity = h
        .registry
        .mentor_activity_view()
        .grouped_by_status(m)
        .await
        .unwrap();

    let pending: Vec<_> = activity.pending.iter().map(|b| b.booking_id).collect();
    assert_eq!(pending, vec![booking_ids[3], booking_ids[2], booking_ids[1]]);
    assert_eq!(activity.confirmed.len(), 1);
    assert_eq!(activity.confirmed[0].booking_id, booking_ids[0]);
    assert!(activity.completed.is_empty());
    assert_eq!(activity.cancelled.len(), 1);
    assert_eq!(
        activity.cancelled[0].cancel_reason.as_deref(),
        Some("Exam week")
    );
}

#[tokio::test]
async fn mentor_without_bookings_has_empty_groups() {
    let h = Harness::new();
    let m = UserId::new();
    h.open_schedule(m, tomorrow(), &[2]).await;

    let activity = h
        .registry
        .mentor_activity_view()
        .grouped_by_status(m)
        .await
        .unwrap();
    assert!(activity.pending.is_empty());
    assert!(activity.confirmed.is_empty());
    assert!(activity.completed.is_empty());
    assert!(activity.cancelled.is_empty());
}

use chrono::NaiveDateTime;
use derive_new::new;

use crate::model::{
    booking::{BookingStatus, ServiceCategory},
    id::{BookingId, ScheduleId, UserId},
    role::Actor,
};

#[derive(Debug, new)]
pub struct ReserveSchedule {
    pub schedule_id: ScheduleId,
    pub mentee_id: UserId,
    pub description: String,
    pub service: ServiceCategory,
    pub requested_at: NaiveDateTime,
}

// リポジトリへ渡す新規予約。スケジュールの確保と同時に記録される
#[derive(Debug, Clone, new)]
pub struct CreateBooking {
    pub booking_id: BookingId,
    pub schedule_id: ScheduleId,
    pub mentee_id: UserId,
    pub description: String,
    pub service: ServiceCategory,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, new)]
pub struct TransitionBooking {
    pub booking_id: BookingId,
    pub actor: Actor,
    pub target: BookingStatus,
    pub reason: Option<String>,
    pub requested_at: NaiveDateTime,
}

// from は比較対象。現在の状態が一致しない場合は更新しない
#[derive(Debug, Clone, new)]
pub struct UpdateBookingStatus {
    pub booking_id: BookingId,
    pub schedule_id: ScheduleId,
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub cancel_reason: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, new)]
pub struct AttachReview {
    pub booking_id: BookingId,
    pub mentee_id: UserId,
    pub rating: u8,
    pub comment: String,
    pub reviewed_at: NaiveDateTime,
}

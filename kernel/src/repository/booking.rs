use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    booking::{
        event::{AttachReview, CreateBooking, UpdateBookingStatus},
        Booking,
    },
    id::{BookingId, UserId},
};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    // スケジュールの予約フラグを false -> true に切り替え、同時に PENDING の予約を記録する。
    // 同一スケジュールへの同時呼び出しは一件だけが成功し、残りは AlreadyBookedError になる
    async fn reserve(&self, event: CreateBooking) -> AppResult<Booking>;
    // 決済開始に失敗した予約を取り消し、スケジュールを予約可能に戻す
    async fn discard(&self, booking_id: BookingId) -> AppResult<()>;
    // 状態が event.from と一致する場合だけ更新する。CANCELLED ならスケジュールも解放する
    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<Booking>;
    // COMPLETED かつ未レビューの場合だけ記録する
    async fn attach_review(&self, event: AttachReview) -> AppResult<Booking>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    async fn find_by_mentee(&self, mentee_id: UserId) -> AppResult<Vec<Booking>>;
    async fn find_by_mentor(&self, mentor_id: UserId) -> AppResult<Vec<Booking>>;
}

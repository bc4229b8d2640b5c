use std::sync::Arc;

use derive_new::new;
use shared::error::AppResult;

use crate::{
    model::{
        booking::{Booking, BookingStatus},
        id::UserId,
    },
    repository::booking::BookingRepository,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MentorActivity {
    pub pending: Vec<Booking>,
    pub confirmed: Vec<Booking>,
    pub completed: Vec<Booking>,
    pub cancelled: Vec<Booking>,
}

impl MentorActivity {
    // 各グループはセッション日時の新しい順
    pub fn from_bookings(mut bookings: Vec<Booking>) -> Self {
        bookings.sort_by(|a, b| {
            b.schedule
                .starts_at()
                .cmp(&a.schedule.starts_at())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let mut activity = Self::default();
        for booking in bookings {
            match booking.status {
                BookingStatus::Pending => activity.pending.push(booking),
                BookingStatus::Confirmed => activity.confirmed.push(booking),
                BookingStatus::Completed => activity.completed.push(booking),
                BookingStatus::Cancelled => activity.cancelled.push(booking),
            }
        }
        activity
    }
}

#[derive(new)]
pub struct MentorActivityView {
    bookings: Arc<dyn BookingRepository>,
}

impl MentorActivityView {
    pub async fn grouped_by_status(&self, mentor_id: UserId) -> AppResult<MentorActivity> {
        let bookings = self.bookings.find_by_mentor(mentor_id).await?;
        Ok(MentorActivity::from_bookings(bookings))
    }
}

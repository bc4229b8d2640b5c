//! In-memory storage used for local runs and tests.
//!
//! Every schedule sits behind its own mutex, so reservations against
//! different schedules never wait on each other. Lock order is always
//! `schedules` map, then the schedule's mutex, then the `bookings` map.

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDateTime;
use kernel::model::{
    booking::{Booking, BookingSchedule, BookingStatus, Review, ServiceCategory},
    id::{BookingId, ScheduleId, UserId},
    schedule::Schedule,
};
use parking_lot::{Mutex, RwLock};

mod booking;
mod schedule;

#[derive(Debug, Clone)]
struct StoredBooking {
    booking_id: BookingId,
    schedule_id: ScheduleId,
    mentee_id: UserId,
    description: String,
    service: ServiceCategory,
    status: BookingStatus,
    cancel_reason: Option<String>,
    review: Option<Review>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl StoredBooking {
    fn join(&self, schedule: &Schedule) -> Booking {
        Booking {
            booking_id: self.booking_id,
            mentee_id: self.mentee_id,
            description: self.description.clone(),
            service: self.service,
            status: self.status,
            cancel_reason: self.cancel_reason.clone(),
            review: self.review.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            schedule: BookingSchedule {
                schedule_id: schedule.schedule_id,
                mentor_id: schedule.mentor_id,
                date: schedule.date,
                price: schedule.price,
                slots: schedule.slots.clone(),
            },
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    schedules: RwLock<HashMap<ScheduleId, Arc<Mutex<Schedule>>>>,
    bookings: RwLock<HashMap<BookingId, StoredBooking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // 予約の一覧を複製してからスケジュールと結合する
    fn join_where(&self, pred: impl Fn(&StoredBooking) -> bool) -> Vec<Booking> {
        let schedules = self.schedules.read();
        let stored: Vec<StoredBooking> = self
            .bookings
            .read()
            .values()
            .filter(|b| pred(b))
            .cloned()
            .collect();

        stored
            .iter()
            .filter_map(|b| {
                schedules
                    .get(&b.schedule_id)
                    .map(|entry| b.join(&entry.lock()))
            })
            .collect()
    }

    fn schedule_id_of(&self, booking_id: BookingId) -> Option<ScheduleId> {
        self.bookings.read().get(&booking_id).map(|b| b.schedule_id)
    }
}

#[async_trait::async_trait]
impl kernel::repository::health::HealthCheckRepository for MemoryStore {
    async fn check_db(&self) -> bool {
        true
    }
}

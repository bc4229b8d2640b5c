use async_trait::async_trait;
use kernel::model::{
    booking::{
        event::{AttachReview, CreateBooking, UpdateBookingStatus},
        Booking, BookingStatus, Review,
    },
    id::{BookingId, ScheduleId, UserId},
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

use super::{MemoryStore, StoredBooking};

fn booking_not_found(booking_id: BookingId) -> AppError {
    AppError::EntityNotFound(format!("booking {booking_id} not found"))
}

impl MemoryStore {
    fn reserve_schedule(&self, event: CreateBooking) -> AppResult<Booking> {
        let schedules = self.schedules.read();
        let entry = schedules.get(&event.schedule_id).ok_or_else(|| {
            AppError::EntityNotFound(format!("schedule {} not found", event.schedule_id))
        })?;

        // このスケジュールのロックを持っている間に判定と書き込みを済ませる
        let mut schedule = entry.lock();
        if schedule.is_booked {
            return Err(AppError::AlreadyBookedError(format!(
                "schedule {} is already booked",
                event.schedule_id
            )));
        }
        schedule.is_booked = true;
        schedule.updated_at = event.created_at;

        let stored = StoredBooking {
            booking_id: event.booking_id,
            schedule_id: event.schedule_id,
            mentee_id: event.mentee_id,
            description: event.description,
            service: event.service,
            status: BookingStatus::Pending,
            cancel_reason: None,
            review: None,
            created_at: event.created_at,
            updated_at: event.created_at,
        };
        let booking = stored.join(&schedule);
        self.bookings.write().insert(stored.booking_id, stored);
        Ok(booking)
    }

    fn discard_booking(&self, booking_id: BookingId) -> AppResult<()> {
        let schedule_id = self
            .schedule_id_of(booking_id)
            .ok_or_else(|| booking_not_found(booking_id))?;

        let schedules = self.schedules.read();
        match schedules.get(&schedule_id) {
            Some(entry) => {
                let mut schedule = entry.lock();
                self.bookings.write().remove(&booking_id);
                schedule.is_booked = false;
            }
            None => {
                self.bookings.write().remove(&booking_id);
            }
        }
        Ok(())
    }

    fn update_booking_status(&self, event: UpdateBookingStatus) -> AppResult<Booking> {
        let schedules = self.schedules.read();
        let entry = schedules.get(&event.schedule_id).ok_or_else(|| {
            AppError::EntityNotFound(format!("schedule {} not found", event.schedule_id))
        })?;
        let mut schedule = entry.lock();
        let mut bookings = self.bookings.write();
        let stored = bookings
            .get_mut(&event.booking_id)
            .ok_or_else(|| booking_not_found(event.booking_id))?;

        if stored.status != event.from {
            return Err(AppError::InvalidTransitionError {
                from: stored.status.to_string(),
                to: event.to.to_string(),
            });
        }
        stored.status = event.to;
        if event.cancel_reason.is_some() {
            stored.cancel_reason = event.cancel_reason;
        }
        stored.updated_at = event.updated_at;

        if event.to == BookingStatus::Cancelled {
            schedule.is_booked = false;
            schedule.updated_at = event.updated_at;
        }
        Ok(stored.join(&schedule))
    }

    fn attach_booking_review(&self, event: AttachReview) -> AppResult<Booking> {
        let schedule_id: ScheduleId = self
            .schedule_id_of(event.booking_id)
            .ok_or_else(|| booking_not_found(event.booking_id))?;

        let schedules = self.schedules.read();
        let entry = schedules
            .get(&schedule_id)
            .ok_or_else(|| booking_not_found(event.booking_id))?;
        let schedule = entry.lock();
        let mut bookings = self.bookings.write();
        let stored = bookings
            .get_mut(&event.booking_id)
            .ok_or_else(|| booking_not_found(event.booking_id))?;

        if stored.mentee_id != event.mentee_id {
            return Err(AppError::AuthorizationError(
                "only the booking's mentee may review it".into(),
            ));
        }
        if stored.status != BookingStatus::Completed {
            return Err(AppError::InvalidTransitionError {
                from: stored.status.to_string(),
                to: "REVIEWED".into(),
            });
        }
        if stored.review.is_some() {
            return Err(AppError::ConflictError(format!(
                "booking {} has already been reviewed",
                event.booking_id
            )));
        }

        stored.review = Some(Review {
            rating: event.rating,
            comment: event.comment,
            reviewed_at: event.reviewed_at,
        });
        stored.updated_at = event.reviewed_at;
        Ok(stored.join(&schedule))
    }

    fn find_booking(&self, booking_id: BookingId) -> Option<Booking> {
        self.join_where(|b| b.booking_id == booking_id).pop()
    }

    fn bookings_of_mentor(&self, mentor_id: UserId) -> Vec<Booking> {
        self.join_where(|_| true)
            .into_iter()
            .filter(|b| b.mentor_id() == mentor_id)
            .collect()
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn reserve(&self, event: CreateBooking) -> AppResult<Booking> {
        self.reserve_schedule(event)
    }

    async fn discard(&self, booking_id: BookingId) -> AppResult<()> {
        self.discard_booking(booking_id)
    }

    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<Booking> {
        self.update_booking_status(event)
    }

    async fn attach_review(&self, event: AttachReview) -> AppResult<Booking> {
        self.attach_booking_review(event)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self.find_booking(booking_id))
    }

    async fn find_by_mentee(&self, mentee_id: UserId) -> AppResult<Vec<Booking>> {
        let mut bookings = self.join_where(|b| b.mentee_id == mentee_id);
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn find_by_mentor(&self, mentor_id: UserId) -> AppResult<Vec<Booking>> {
        Ok(self.bookings_of_mentor(mentor_id))
    }
}

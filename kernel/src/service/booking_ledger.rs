use std::{sync::Arc, time::Duration};

use chrono::Duration as ChronoDuration;
use derive_new::new;
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};

use crate::{
    gateway::{PaymentGateway, PaymentHandle},
    model::{
        booking::{
            event::{
                AttachReview, CreateBooking, ReserveSchedule, TransitionBooking,
                UpdateBookingStatus,
            },
            Booking, BookingStatus,
        },
        id::{BookingId, UserId},
        role::{Actor, Role},
    },
    repository::{booking::BookingRepository, schedule::ScheduleRepository},
};

pub const MIN_DESCRIPTION_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct Reservation {
    pub booking: Booking,
    pub payment: PaymentHandle,
}

#[derive(new)]
pub struct BookingLedger {
    schedules: Arc<dyn ScheduleRepository>,
    bookings: Arc<dyn BookingRepository>,
    gateway: Arc<dyn PaymentGateway>,
    lead_time: ChronoDuration,
    payment_timeout: Duration,
}

impl BookingLedger {
    pub async fn reserve(&self, event: ReserveSchedule) -> AppResult<Reservation> {
        if event.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
            return Err(AppError::ValidationError(format!(
                "description must be at least {MIN_DESCRIPTION_LEN} characters"
            )));
        }

        let schedule = self
            .schedules
            .find_by_id(event.schedule_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("schedule {} not found", event.schedule_id))
            })?;
        // 予約済みならリードタイムより先に再試行可能なエラーを返す
        if schedule.is_booked {
            return Err(AppError::AlreadyBookedError(format!(
                "schedule {} is already booked",
                schedule.schedule_id
            )));
        }
        if schedule.earliest_start() < event.requested_at + self.lead_time {
            return Err(AppError::ValidationError(format!(
                "schedule {} starts too soon to be booked",
                schedule.schedule_id
            )));
        }

        let booking_id = BookingId::new();
        let booking = self
            .bookings
            .reserve(CreateBooking::new(
                booking_id,
                event.schedule_id,
                event.mentee_id,
                event.description.trim().to_string(),
                event.service,
                event.requested_at,
            ))
            .await
            .inspect_err(|e| {
                if matches!(e, AppError::AlreadyBookedError(_)) {
                    tracing::info!(schedule_id = %event.schedule_id, "reservation lost the race");
                }
            })?;
        tracing::info!(
            booking_id = %booking_id,
            schedule_id = %event.schedule_id,
            mentee_id = %event.mentee_id,
            "schedule reserved"
        );

        // 呼び出し元が待つのをやめても、支払い開始とロールバックは最後まで走らせる
        let payment = tokio::spawn(initiate_or_roll_back(
            self.gateway.clone(),
            self.bookings.clone(),
            self.payment_timeout,
            booking_id,
            booking.schedule.price,
        ))
        .await
        .map_err(|e| AppError::UpstreamError(format!("payment task did not finish: {e}")))??;

        Ok(Reservation { booking, payment })
    }

    pub async fn transition(&self, event: TransitionBooking) -> AppResult<Booking> {
        let booking = self.find(event.booking_id).await?;
        booking.status.ensure_transition(event.target)?;
        authorize_transition(&booking, event.actor, event.target)?;

        let cancel_reason = match event.target {
            BookingStatus::Cancelled => {
                let reason = event
                    .reason
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| {
                        AppError::ValidationError("a cancellation needs a reason".into())
                    })?;
                Some(reason.to_string())
            }
            _ => None,
        };

        let updated = self
            .bookings
            .update_status(UpdateBookingStatus::new(
                booking.booking_id,
                booking.schedule.schedule_id,
                booking.status,
                event.target,
                cancel_reason,
                event.requested_at,
            ))
            .await?;

        tracing::info!(
            booking_id = %updated.booking_id,
            from = %booking.status,
            to = %updated.status,
            actor = %event.actor.role,
            "booking transitioned"
        );
        Ok(updated)
    }

    pub async fn attach_review(&self, event: AttachReview) -> AppResult<Booking> {
        if !(1..=5).contains(&event.rating) {
            return Err(AppError::ValidationError(
                "rating must be between 1 and 5".into(),
            ));
        }
        if event.comment.trim().is_empty() {
            return Err(AppError::ValidationError("review must not be empty".into()));
        }

        let booking = self.find(event.booking_id).await?;
        if booking.mentee_id != event.mentee_id {
            return Err(AppError::AuthorizationError(
                "only the booking's mentee may review it".into(),
            ));
        }
        if booking.status != BookingStatus::Completed {
            return Err(AppError::InvalidTransitionError {
                from: booking.status.to_string(),
                to: "REVIEWED".into(),
            });
        }
        if booking.review.is_some() {
            return Err(AppError::ConflictError(format!(
                "booking {} has already been reviewed",
                booking.booking_id
            )));
        }

        self.bookings
            .attach_review(AttachReview {
                comment: event.comment.trim().to_string(),
                ..event
            })
            .await
    }

    pub async fn get(&self, booking_id: BookingId, actor: Actor) -> AppResult<Booking> {
        let booking = self.find(booking_id).await?;
        if actor.is_mentee(booking.mentee_id) || actor.is_mentor(booking.mentor_id()) {
            Ok(booking)
        } else {
            Err(AppError::AuthorizationError(format!(
                "booking {booking_id} is not visible to this user"
            )))
        }
    }

    pub async fn list_for_mentee(&self, mentee_id: UserId) -> AppResult<Vec<Booking>> {
        let mut bookings = self.bookings.find_by_mentee(mentee_id).await?;
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn find(&self, booking_id: BookingId) -> AppResult<Booking> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound(format!("booking {booking_id} not found")))
    }
}

async fn initiate_or_roll_back(
    gateway: Arc<dyn PaymentGateway>,
    bookings: Arc<dyn BookingRepository>,
    timeout: Duration,
    booking_id: BookingId,
    amount: Decimal,
) -> AppResult<PaymentHandle> {
    let initiated = tokio::time::timeout(timeout, gateway.initiate_payment(booking_id, amount))
        .await
        .unwrap_or_else(|_| {
            Err(AppError::UpstreamError(format!(
                "payment gateway did not answer within {} ms",
                timeout.as_millis()
            )))
        });

    let e = match initiated {
        Ok(payment) => return Ok(payment),
        Err(e) => e,
    };
    tracing::warn!(
        booking_id = %booking_id,
        error.message = %e,
        "payment initiation failed, rolling back reservation"
    );
    if let Err(rollback) = bookings.discard(booking_id).await {
        tracing::error!(
            booking_id = %booking_id,
            error.cause_chain = ?rollback,
            "failed to roll back reservation"
        );
    }
    Err(match e {
        AppError::UpstreamError(_) => e,
        other => AppError::UpstreamError(format!("payment initiation failed: {other}")),
    })
}

// 確定・完了はメンターのみ。キャンセルはメンターか予約したメンティー
fn authorize_transition(booking: &Booking, actor: Actor, target: BookingStatus) -> AppResult<()> {
    let allowed = match (target, actor.role) {
        (BookingStatus::Confirmed | BookingStatus::Completed, Role::Mentor) => {
            actor.is_mentor(booking.mentor_id())
        }
        (BookingStatus::Cancelled, Role::Mentor) => actor.is_mentor(booking.mentor_id()),
        (BookingStatus::Cancelled, Role::Mentee) => actor.is_mentee(booking.mentee_id),
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(format!(
            "{} {} may not move booking {} to {}",
            actor.role, actor.user_id, booking.booking_id, target
        )))
    }
}

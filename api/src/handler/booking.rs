use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    booking::event::{AttachReview, ReserveSchedule, TransitionBooking},
    id::{BookingId, ScheduleId},
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::booking::{
        BookingResponse, BookingsResponse, ReservationResponse, ReserveScheduleRequest,
        ReviewBookingRequest, TransitionBookingRequest,
    },
};

pub async fn reserve_schedule(
    user: AuthorizedUser,
    Path(schedule_id): Path<ScheduleId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<ReserveScheduleRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    user.require_mentee()?;
    req.validate(&())?;

    let service = req.service_category()?;
    let reserve = ReserveSchedule::new(
        schedule_id,
        user.id(),
        req.description,
        service,
        super::now(),
    );
    registry
        .booking_ledger()
        .reserve(reserve)
        .await
        .map(|reservation| (StatusCode::CREATED, Json(reservation.into())))
}

pub async fn show_my_bookings(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    user.require_mentee()?;

    registry
        .booking_ledger()
        .list_for_mentee(user.id())
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    registry
        .booking_ledger()
        .get(booking_id, user.actor())
        .await
        .map(BookingResponse::from)
        .map(Json)
}

pub async fn transition_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<TransitionBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    req.validate(&())?;

    let transition = TransitionBooking::new(
        booking_id,
        user.actor(),
        req.target()?,
        req.reason,
        super::now(),
    );
    registry
        .booking_ledger()
        .transition(transition)
        .await
        .map(BookingResponse::from)
        .map(Json)
}

pub async fn review_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<ReviewBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    user.require_mentee()?;
    req.validate(&())?;

    let review = AttachReview::new(booking_id, user.id(), req.rating, req.comment, super::now());
    registry
        .booking_ledger()
        .attach_review(review)
        .await
        .map(BookingResponse::from)
        .map(Json)
}

use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    booking::{
        event::{AttachReview, CreateBooking, UpdateBookingStatus},
        Booking, BookingStatus,
    },
    id::{BookingId, ScheduleId, UserId},
    time_slot::TimeSlotCatalog,
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::booking::{BookingRow, BookingStateRow},
    ConnectionPool,
};

const SELECT_BOOKING: &str = r#"
    SELECT
        b.booking_id,
        b.mentee_id,
        b.description,
        b.service,
        b.status,
        b.cancel_reason,
        b.rating,
        b.review,
        b.reviewed_at,
        b.created_at,
        b.updated_at,
        s.schedule_id,
        s.mentor_id,
        s.date,
        s.price,
        s.slot_ids
    FROM bookings AS b
    INNER JOIN schedules AS s ON b.schedule_id = s.schedule_id
"#;

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
    catalog: Arc<TimeSlotCatalog>,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn reserve(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        // 予約フラグの比較と更新を一文で行う。
        // 同じ行への同時更新は行ロックで直列化され、後続は is_booked = TRUE を見て 0 件になる
        {
            let res = sqlx::query(
                r#"
                    UPDATE schedules
                    SET is_booked = TRUE, updated_at = $2
                    WHERE schedule_id = $1 AND is_booked = FALSE
                "#,
            )
            .bind(event.schedule_id)
            .bind(event.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                let exists: Option<bool> =
                    sqlx::query_scalar("SELECT is_booked FROM schedules WHERE schedule_id = $1")
                        .bind(event.schedule_id)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(AppError::SpecificOperationError)?;
                return Err(match exists {
                    None => AppError::EntityNotFound(format!(
                        "schedule {} not found",
                        event.schedule_id
                    )),
                    Some(_) => AppError::AlreadyBookedError(format!(
                        "schedule {} is already booked",
                        event.schedule_id
                    )),
                });
            }
        }

        let res = sqlx::query(
            r#"
                INSERT INTO bookings
                (booking_id, schedule_id, mentee_id, description, service, status,
                created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            "#,
        )
        .bind(event.booking_id)
        .bind(event.schedule_id)
        .bind(event.mentee_id)
        .bind(&event.description)
        .bind(event.service.to_string())
        .bind(BookingStatus::Pending.to_string())
        .bind(event.created_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been created".into(),
            ));
        }

        let booking = self.select_in(&mut tx, event.booking_id).await?;
        tx.commit().await.map_err(AppError::TransactionError)?;

        booking.ok_or_else(|| {
            AppError::EntityNotFound(format!("booking {} not found", event.booking_id))
        })
    }

    async fn discard(&self, booking_id: BookingId) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let schedule_id: Option<ScheduleId> = sqlx::query_scalar(
            r#"
                DELETE FROM bookings WHERE booking_id = $1
                RETURNING schedule_id
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(schedule_id) = schedule_id else {
            return Err(AppError::EntityNotFound(format!(
                "booking {booking_id} not found"
            )));
        };

        sqlx::query("UPDATE schedules SET is_booked = FALSE WHERE schedule_id = $1")
            .bind(schedule_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(())
    }

    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        // 読み出した時点の状態と一致する場合だけ遷移させる
        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET status = $3,
                    cancel_reason = COALESCE($4, cancel_reason),
                    updated_at = $5
                WHERE booking_id = $1 AND status = $2
            "#,
        )
        .bind(event.booking_id)
        .bind(event.from.to_string())
        .bind(event.to.to_string())
        .bind(&event.cancel_reason)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            let current = self.state_in(&mut tx, event.booking_id).await?;
            return Err(AppError::InvalidTransitionError {
                from: current.status,
                to: event.to.to_string(),
            });
        }

        if event.to == BookingStatus::Cancelled {
            sqlx::query(
                r#"
                    UPDATE schedules
                    SET is_booked = FALSE, updated_at = $2
                    WHERE schedule_id = $1
                "#,
            )
            .bind(event.schedule_id)
            .bind(event.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        let booking = self.select_in(&mut tx, event.booking_id).await?;
        tx.commit().await.map_err(AppError::TransactionError)?;

        booking.ok_or_else(|| {
            AppError::EntityNotFound(format!("booking {} not found", event.booking_id))
        })
    }

    async fn attach_review(&self, event: AttachReview) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET rating = $3, review = $4, reviewed_at = $5, updated_at = $5
                WHERE booking_id = $1 AND mentee_id = $2
                  AND status = 'COMPLETED' AND rating IS NULL
            "#,
        )
        .bind(event.booking_id)
        .bind(event.mentee_id)
        .bind(i16::from(event.rating))
        .bind(&event.comment)
        .bind(event.reviewed_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            let current = self.state_in(&mut tx, event.booking_id).await?;
            return Err(if current.status != BookingStatus::Completed.to_string() {
                AppError::InvalidTransitionError {
                    from: current.status,
                    to: "REVIEWED".into(),
                }
            } else if current.rating.is_some() {
                AppError::ConflictError(format!(
                    "booking {} has already been reviewed",
                    event.booking_id
                ))
            } else {
                AppError::AuthorizationError("only the booking's mentee may review it".into())
            });
        }

        let booking = self.select_in(&mut tx, event.booking_id).await?;
        tx.commit().await.map_err(AppError::TransactionError)?;

        booking.ok_or_else(|| {
            AppError::EntityNotFound(format!("booking {} not found", event.booking_id))
        })
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{SELECT_BOOKING} WHERE b.booking_id = $1"))
                .bind(booking_id)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        row.map(|r| r.into_booking(&self.catalog)).transpose()
    }

    async fn find_by_mentee(&self, mentee_id: UserId) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{SELECT_BOOKING} WHERE b.mentee_id = $1 ORDER BY b.created_at DESC"
        ))
        .bind(mentee_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter()
            .map(|r| r.into_booking(&self.catalog))
            .collect()
    }

    async fn find_by_mentor(&self, mentor_id: UserId) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{SELECT_BOOKING} WHERE s.mentor_id = $1 ORDER BY s.date DESC"
        ))
        .bind(mentor_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter()
            .map(|r| r.into_booking(&self.catalog))
            .collect()
    }
}

impl BookingRepositoryImpl {
    // トランザクション内で結合済みの予約を読み出す
    async fn select_in(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        booking_id: BookingId,
    ) -> AppResult<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{SELECT_BOOKING} WHERE b.booking_id = $1"))
                .bind(booking_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

        row.map(|r| r.into_booking(&self.catalog)).transpose()
    }

    async fn state_in(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        booking_id: BookingId,
    ) -> AppResult<BookingStateRow> {
        sqlx::query_as("SELECT status, rating FROM bookings WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?
            .ok_or_else(|| AppError::EntityNotFound(format!("booking {booking_id} not found")))
    }
}

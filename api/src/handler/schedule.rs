use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{ScheduleId, UserId},
    schedule::event::DeleteSchedule,
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::schedule::{
        CreateScheduleRequest, CreateScheduleRequestWithIds, GridChangesResponse,
        ScheduleResponse, SchedulesResponse, ToggleGridRequest, ToggleGridRequestWithIds,
        UpdateScheduleRequest, UpdateScheduleRequestWithIds,
    },
};

pub async fn register_schedule(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateScheduleRequest>,
) -> AppResult<(StatusCode, Json<ScheduleResponse>)> {
    user.require_mentor()?;
    req.validate(&())?;

    let create_schedule = CreateScheduleRequestWithIds::new(user.id(), super::now(), req);
    registry
        .schedule_store()
        .create(create_schedule.into())
        .await
        .map(|schedule| (StatusCode::CREATED, Json(schedule.into())))
}

pub async fn toggle_schedule_grid(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<ToggleGridRequest>,
) -> AppResult<Json<GridChangesResponse>> {
    user.require_mentor()?;
    req.validate(&())?;

    let toggle_grid = ToggleGridRequestWithIds::new(user.id(), super::now(), req);
    registry
        .schedule_store()
        .toggle_grid(toggle_grid.into())
        .await
        .map(GridChangesResponse::from)
        .map(Json)
}

pub async fn show_schedule(
    _user: AuthorizedUser,
    Path(schedule_id): Path<ScheduleId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ScheduleResponse>> {
    registry
        .schedule_store()
        .get_by_id(schedule_id)
        .await
        .map(ScheduleResponse::from)
        .map(Json)
}

pub async fn show_mentor_schedules(
    _user: AuthorizedUser,
    Path(mentor_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SchedulesResponse>> {
    registry
        .schedule_store()
        .get_by_mentor(mentor_id)
        .await
        .map(SchedulesResponse::from)
        .map(Json)
}

pub async fn update_schedule(
    user: AuthorizedUser,
    Path(schedule_id): Path<ScheduleId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateScheduleRequest>,
) -> AppResult<Json<ScheduleResponse>> {
    user.require_mentor()?;
    req.validate(&())?;

    let update_schedule =
        UpdateScheduleRequestWithIds::new(schedule_id, user.id(), super::now(), req);
    registry
        .schedule_store()
        .update(update_schedule.into())
        .await
        .map(ScheduleResponse::from)
        .map(Json)
}

pub async fn delete_schedule(
    user: AuthorizedUser,
    Path(schedule_id): Path<ScheduleId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.require_mentor()?;

    let delete_schedule = DeleteSchedule::new(schedule_id, user.id());
    registry
        .schedule_store()
        .delete(delete_schedule)
        .await
        .map(|_| StatusCode::OK)
}

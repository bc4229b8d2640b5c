use axum::{
    extract::{Path, Query, State},
    Json,
};
use garde::Validate;
use kernel::model::id::UserId;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::availability::{AvailabilityQuery, AvailabilityResponse, DEFAULT_HORIZON_DAYS},
};

pub async fn show_availability(
    _user: AuthorizedUser,
    Path(mentor_id): Path<UserId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    query.validate(&())?;

    let as_of = query.as_of.unwrap_or_else(super::now);
    let horizon_days = query.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS);
    let availability = registry.availability_filter();
    let days = availability
        .list_eligible(mentor_id, as_of, horizon_days)
        .await?;

    Ok(Json(AvailabilityResponse {
        mentor_id,
        as_of,
        horizon_days,
        lead_time_hours: availability.lead_time().num_hours(),
        days: days.into_iter().map(Into::into).collect(),
    }))
}

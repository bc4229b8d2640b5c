use axum::{extract::State, Json};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{extractor::AuthorizedUser, model::activity::MentorActivityResponse};

pub async fn show_mentor_activity(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MentorActivityResponse>> {
    user.require_mentor()?;

    registry
        .mentor_activity_view()
        .grouped_by_status(user.id())
        .await
        .map(MentorActivityResponse::from)
        .map(Json)
}

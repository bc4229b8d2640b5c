use axum::{extract::State, Json};
use registry::AppRegistry;

use crate::model::time_slot::TimeSlotsResponse;

pub async fn show_time_slots(State(registry): State<AppRegistry>) -> Json<TimeSlotsResponse> {
    Json(registry.schedule_store().catalog().all().into())
}

use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::time_slot::show_time_slots;

pub fn build_time_slot_routers() -> Router<AppRegistry> {
    Router::new().route("/time-slots", get(show_time_slots))
}

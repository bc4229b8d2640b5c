use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    booking::reserve_schedule,
    schedule::{
        delete_schedule, register_schedule, show_schedule, toggle_schedule_grid, update_schedule,
    },
};

pub fn build_schedule_routers() -> Router<AppRegistry> {
    let schedules_routers = Router::new()
        .route("/", post(register_schedule))
        .route("/grid", post(toggle_schedule_grid))
        .route("/:schedule_id", get(show_schedule))
        .route("/:schedule_id", put(update_schedule))
        .route("/:schedule_id", delete(delete_schedule))
        .route("/:schedule_id/bookings", post(reserve_schedule));

    Router::new().nest("/schedules", schedules_routers)
}

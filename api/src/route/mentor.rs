use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::{availability::show_availability, schedule::show_mentor_schedules};

pub fn build_mentor_routers() -> Router<AppRegistry> {
    let mentors_routers = Router::new()
        .route("/:mentor_id/schedules", get(show_mentor_schedules))
        .route("/:mentor_id/availability", get(show_availability));

    Router::new().nest("/mentors", mentors_routers)
}

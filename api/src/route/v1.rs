use axum::Router;
use registry::AppRegistry;

use super::{
    activity::build_activity_routers, booking::build_booking_routers,
    health::build_health_check_routers, mentor::build_mentor_routers,
    schedule::build_schedule_routers, time_slot::build_time_slot_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_time_slot_routers())
        .merge(build_schedule_routers())
        .merge(build_mentor_routers())
        .merge(build_booking_routers())
        .merge(build_activity_routers());
    Router::new().nest("/api/v1", router)
}

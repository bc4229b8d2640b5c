use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{review_booking, show_booking, show_my_bookings, transition_booking};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let bookings_routers = Router::new()
        .route("/", get(show_my_bookings))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id/status", put(transition_booking))
        .route("/:booking_id/review", put(review_booking));

    Router::new().nest("/bookings", bookings_routers)
}

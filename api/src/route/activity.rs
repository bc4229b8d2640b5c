use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::activity::show_mentor_activity;

pub fn build_activity_routers() -> Router<AppRegistry> {
    Router::new().route("/activity", get(show_mentor_activity))
}

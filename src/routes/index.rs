//! `GET /` resource index.

use axum::{Json, Router, routing::get};

use crate::{dto::index::RouteDescriptor, state::SharedState};

#[utoipa::path(
    get,
    path = "/",
    tag = "index",
    responses((status = 200, description = "Available resources", body = [RouteDescriptor]))
)]
/// List the resources served by the API and the methods they accept.
pub async fn index() -> Json<Vec<RouteDescriptor>> {
    Json(vec![
        RouteDescriptor::new("/login", &["POST"]),
        RouteDescriptor::new("/teams", &["GET", "POST"]),
        RouteDescriptor::new("/teams/{slug}", &["GET", "PATCH", "DELETE"]),
        RouteDescriptor::new("/games", &["GET", "POST"]),
        RouteDescriptor::new("/games/{id}", &["GET", "PATCH", "DELETE"]),
    ])
}

/// Configure the index route.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/", get(index))
}

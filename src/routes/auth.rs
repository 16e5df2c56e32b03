//! `POST /login` and the bearer-token guard.

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
    routing::post,
};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::AppError,
    services::auth_service,
    state::SharedState,
};

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 400, description = "Missing or invalid credentials")
    )
)]
pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(auth_service::login(&state, payload).await?))
}

/// Configure the login route.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/login", post(login))
}

/// Reject requests without a live session and expose its user to the handler as an extension.
pub async fn require_session(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let user = auth_service::authenticate(&state, header)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

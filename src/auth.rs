use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{errors::AppError, AppState};

/// Guard composed in front of measure creation. Rejects before the handler runs.
pub async fn require_capability_token(
    State(state): State<AppState>,
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = auth_header.as_ref().map(|TypedHeader(auth)| auth.token());
    check_capability_token(presented, &state.api_token)?;
    Ok(next.run(request).await)
}

fn check_capability_token(presented: Option<&str>, expected: &str) -> Result<(), AppError> {
    match presented {
        None => Err(AppError::unauthorized(
            "missing_token",
            "missing authorization header",
        )),
        Some(token) if token != expected => Err(AppError::unauthorized(
            "invalid_token",
            "invalid capability token",
        )),
        Some(_) => Ok(()),
    }
}

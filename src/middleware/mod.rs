use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, utils::extractors::extract_claims, AppState};

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = extract_claims(req.headers(), &state.auth)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

pub async fn admin_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = extract_claims(req.headers(), &state.auth)?;

    if !claims.is_admin {
        tracing::warn!("User {} denied admin access", claims.username);
        return Err(AppError::Forbidden(
            "Access denied. Administrator privileges required.".to_string(),
        ));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

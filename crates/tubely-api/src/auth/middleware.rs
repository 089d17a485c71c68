use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tubely_core::AppError;

use crate::auth::jwt::CredentialValidator;
use crate::auth::models::CallerIdentity;
use crate::error::HttpAppError;

#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<dyn CredentialValidator>,
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let header = header.ok_or_else(|| {
        AppError::Unauthenticated("Missing authorization header".to_string())
    })?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AppError::Unauthenticated(
            "Authorization header must use the Bearer scheme".to_string(),
        )),
    }
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let user_id = match bearer_token(header).and_then(|token| auth_state.validator.validate(token))
    {
        Ok(user_id) => user_id,
        Err(e) => return HttpAppError(e).into_response(),
    };

    tracing::Span::current().record("user_id", tracing::field::display(user_id));
    request.extensions_mut().insert(CallerIdentity { user_id });

    next.run(request).await
}

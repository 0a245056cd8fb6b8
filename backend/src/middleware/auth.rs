use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    models::user::{User, UserGroupName},
    repositories::user as user_repo,
    utils::jwt::{self, TokenError},
};

/// Authenticated caller, attached to the request extensions by the auth
/// layers below.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub group: UserGroupName,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.group == UserGroupName::Admin
    }
}

pub async fn auth(
    State((pool, config)): State<(PgPool, Config)>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = extract_auth_header(request.headers());
    let current = authenticate_request(auth_header.as_deref(), &pool, &config).await?;
    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}

// Auth + require the admin group for admin-only routes
pub async fn auth_admin(
    State((pool, config)): State<(PgPool, Config)>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = extract_auth_header(request.headers());
    let current = authenticate_request(auth_header.as_deref(), &pool, &config).await?;
    if !current.is_admin() {
        return Err(AppError::Forbidden("Not enough permissions".to_string()));
    }
    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    if let Some(rest) = header.strip_prefix("Bearer ") {
        return Some(rest);
    }
    if let Some(space_idx) = header.find(' ') {
        let (scheme, rest) = header.split_at(space_idx);
        if scheme.eq_ignore_ascii_case("bearer") {
            return Some(rest.trim_start());
        }
    }
    None
}

async fn authenticate_request(
    auth_header: Option<&str>,
    pool: &PgPool,
    config: &Config,
) -> Result<CurrentUser, AppError> {
    let token = auth_header
        .and_then(parse_bearer_token)
        .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))?;

    let claims = jwt::verify_access_token(token, config).map_err(|err| match err {
        TokenError::Expired => AppError::Unauthorized("Token has expired.".to_string()),
        TokenError::Invalid => {
            AppError::Unauthorized("Could not validate credentials".to_string())
        }
    })?;

    let user = user_repo::find_user_by_email(pool, &claims.email)
        .await?
        .ok_or_else(|| AppError::Forbidden("User not found".to_string()))?;

    let group = user_repo::find_group_name(pool, user.group_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("User not found".to_string()))?;

    Ok(CurrentUser { user, group })
}

fn extract_auth_header(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
}

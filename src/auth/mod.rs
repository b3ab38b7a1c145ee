pub mod authorize;
pub mod token;

use actix_web::{
    cookie::{time::OffsetDateTime, Cookie, Expiration},
    HttpRequest,
};
use chrono::Utc;

use crate::app::{AppError, AppState};
use crate::database::models::user::User;

pub const TOKEN_COOKIE: &str = "token";

/// Resolves the session cookie on `req` to exactly one user record, or
/// fails with a uniform `Unauthenticated`. Every request re-resolves
/// against the Identity Store; nothing is cached.
pub fn authenticate(req: &HttpRequest, state: &AppState) -> Result<User, AppError> {
    let cookie = req.cookie(TOKEN_COOKIE).ok_or(AppError::Unauthenticated)?;
    let user_id = state.keys.verify(cookie.value())?;

    state
        .identity
        .find_by_id(&user_id)?
        .ok_or(AppError::Unauthenticated)
}

/// HTTP-only session cookie carrying the signed token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .expires(Expiration::DateTime(
            OffsetDateTime::from_unix_timestamp(
                Utc::now().timestamp() + token::SESSION_TTL_DAYS as i64 * 86400,
            )
            .unwrap(),
        ))
        .finish()
}

/// Expired cookie used to clear the session on logout.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "0").path("/").finish();
    cookie.make_removal();

    cookie
}

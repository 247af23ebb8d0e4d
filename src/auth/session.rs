//! Responses that start and end a session.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;
use time::Duration;

use crate::{
    UserID,
    auth::{invalidate_auth_cookie, set_auth_cookie},
};

/// Set the auth cookie for `user_id` and redirect the client to `redirect_url`.
///
/// If the cookie cannot be created, the error is logged and an internal
/// server error page is returned with the auth cookie cleared.
pub fn log_in_response(
    jar: PrivateCookieJar,
    user_id: UserID,
    cookie_duration: Duration,
    redirect_url: &str,
) -> Response {
    match set_auth_cookie(jar.clone(), user_id, cookie_duration) {
        Ok(jar) => (jar, Redirect::to(redirect_url)).into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie for user {user_id}: {error}");
            (invalidate_auth_cookie(jar), error).into_response()
        }
    }
}

/// Invalidate the auth cookie and redirect the client to the log-in page.
pub fn log_out_response(jar: PrivateCookieJar, log_in_view: &str) -> Response {
    let jar = invalidate_auth_cookie(jar);

    (jar, Redirect::to(log_in_view)).into_response()
}

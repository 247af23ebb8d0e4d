//! The log-in page and the endpoints that start and end a payroll session.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{log_in_response, log_out_response},
    endpoints::payroll as endpoints,
    html::{base, form_card, form_error, link, password_input, submit_button, text_input},
    payroll::user::get_user_by_username,
};

const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid credentials!";

/// The form data for logging in.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInForm {
    pub username: String,
    pub password: String,
}

fn log_in_view(username: &str, error_message: Option<&str>) -> Markup {
    let log_in_form = html! {
        form action=(endpoints::LOG_IN) method="post"
        {
            (form_error(error_message))
            (text_input("Username", "username", "text", username))
            (password_input("Password", "password", None))
            (submit_button("Log In"))

            p
            {
                "Don't have an account? "
                (link(endpoints::REGISTER, "Register here"))
            }
        }
    };

    base("Log In", "Payroll", &form_card("Payroll Log In", &log_in_form))
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    log_in_view("", None).into_response()
}

/// Check the username and password and, if they match, start a session and
/// redirect to the dashboard.
pub async fn log_in_payroll_user(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Response {
    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match get_user_by_username(&form.username, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                return log_in_view(&form.username, Some(INVALID_CREDENTIALS_ERROR_MSG))
                    .into_response();
            }
            Err(error) => {
                tracing::error!("Error getting user by username: {error}");
                return error.into_response();
            }
        }
    };

    match user.password_hash.verify(&form.password) {
        Ok(true) => log_in_response(
            jar,
            user.id,
            state.cookie_duration,
            endpoints::DASHBOARD_VIEW,
        ),
        Ok(false) => {
            log_in_view(&form.username, Some(INVALID_CREDENTIALS_ERROR_MSG)).into_response()
        }
        Err(error) => {
            tracing::error!("Error verifying password: {error}");
            Error::HashingError(error.to_string()).into_response()
        }
    }
}

/// End the session and return to the log-in page.
pub async fn log_out_payroll_user(jar: PrivateCookieJar) -> Response {
    log_out_response(jar, endpoints::ROOT)
}

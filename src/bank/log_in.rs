//! The sign-in page and the endpoints that start and end a customer's session.

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
    bank::user::get_user_by_account_number,
    endpoints::bank as endpoints,
    html::{base, form_card, form_error, link, password_input, submit_button, text_input},
};

const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid credentials";

/// The form data for signing in.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LogInForm {
    pub account_number: String,
    pub pin: String,
}

fn sign_in_view(account_number: &str, error_message: Option<&str>) -> Markup {
    let sign_in_form = html! {
        form action=(endpoints::LOG_IN) method="post"
        {
            (form_error(error_message))
            (text_input("Account Number", "account_number", "text", account_number))
            (password_input("PIN", "pin", None))
            (submit_button("Sign In"))

            p
            {
                "Don't have an account? "
                (link(endpoints::ROOT, "Sign up here"))
            }
        }
    };

    base("Sign In", "Bank", &form_card("Sign In", &sign_in_form))
}

/// Display the sign-in page.
pub async fn get_sign_in_page() -> Response {
    sign_in_view("", None).into_response()
}

/// Check the account number and PIN and, if they match, start a session and
/// redirect to the dashboard.
pub async fn log_in_bank_user(
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

        match get_user_by_account_number(&form.account_number, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                return sign_in_view(&form.account_number, Some(INVALID_CREDENTIALS_ERROR_MSG))
                    .into_response();
            }
            Err(error) => {
                tracing::error!("Error getting user by account number: {error}");
                return error.into_response();
            }
        }
    };

    match user.pin_hash.verify(&form.pin) {
        Ok(true) => log_in_response(
            jar,
            user.id,
            state.cookie_duration,
            endpoints::DASHBOARD_VIEW,
        ),
        Ok(false) => {
            sign_in_view(&form.account_number, Some(INVALID_CREDENTIALS_ERROR_MSG)).into_response()
        }
        Err(error) => {
            tracing::error!("Error verifying PIN: {error}");
            Error::HashingError(error.to_string()).into_response()
        }
    }
}

/// End the customer's session and return to the sign-in page.
pub async fn log_out_bank_user(jar: PrivateCookieJar) -> Response {
    log_out_response(jar, endpoints::SIGN_IN_VIEW)
}

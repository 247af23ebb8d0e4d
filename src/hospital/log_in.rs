//! The log-in page and the endpoints that start and end a staff session.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{log_in_response, log_out_response},
    endpoints::hospital as endpoints,
    hospital::user::get_user_by_username,
    html::{base, form_card, form_error, link, password_input, submit_button, text_input},
};

const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid username or password";

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
                "New staff member? "
                (link(endpoints::REGISTER, "Register here"))
            }
        }
    };

    base("Log In", "Hospital", &form_card("Hospital Log In", &log_in_form))
}

/// The root page has no content of its own.
pub async fn redirect_to_log_in() -> Redirect {
    Redirect::to(endpoints::LOG_IN)
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    log_in_view("", None).into_response()
}

/// Check the username and password and, if they match, start a session and
/// redirect to the dashboard.
pub async fn log_in_hospital_user(
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
pub async fn log_out_hospital_user(jar: PrivateCookieJar) -> Response {
    log_out_response(jar, endpoints::LOG_IN)
}

#[cfg(test)]
mod log_in_tests {
    use axum::http::StatusCode;

    use crate::{
        App,
        auth::COOKIE_TOKEN,
        endpoints::hospital as endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input, assert_redirect, assert_valid_html,
            get_test_server, must_get_form, parse_html,
        },
    };

    use super::INVALID_CREDENTIALS_ERROR_MSG;

    const REGISTER_FORM: [(&str, &str); 6] = [
        ("full_name", "Grace Hopper"),
        ("email", "grace@example.com"),
        ("phone", "555-0100"),
        ("role", "Receptionist"),
        ("username", "grace"),
        ("password", "hunter2"),
    ];

    #[tokio::test]
    async fn root_redirects_to_log_in() {
        let server = get_test_server(App::Hospital);

        assert_redirect(&server.get(endpoints::ROOT).await, endpoints::LOG_IN);
    }

    #[tokio::test]
    async fn render_log_in_page() {
        let server = get_test_server(App::Hospital);

        let response = server.get(endpoints::LOG_IN).await;

        response.assert_status_ok();
        let document = parse_html(&response.text());
        assert_valid_html(&document);
        let form = must_get_form(&document, endpoints::LOG_IN);
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");
    }

    #[tokio::test]
    async fn log_in_succeeds_with_correct_password() {
        let server = get_test_server(App::Hospital);
        server
            .post(endpoints::REGISTER)
            .form(&REGISTER_FORM)
            .await
            .assert_status_see_other();

        let response = server
            .post(endpoints::LOG_IN)
            .form(&[("username", "grace"), ("password", "hunter2")])
            .await;

        assert_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert!(response.cookies().get(COOKIE_TOKEN).is_some());
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = get_test_server(App::Hospital);
        server
            .post(endpoints::REGISTER)
            .form(&REGISTER_FORM)
            .await
            .assert_status_see_other();

        let response = server
            .post(endpoints::LOG_IN)
            .form(&[("username", "grace"), ("password", "nope")])
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.cookies().get(COOKIE_TOKEN).is_none());
        assert_form_error_message(&parse_html(&response.text()), INVALID_CREDENTIALS_ERROR_MSG);
    }

    #[tokio::test]
    async fn log_out_ends_the_session() {
        let mut server = get_test_server(App::Hospital);
        server.save_cookies();
        server
            .post(endpoints::REGISTER)
            .form(&REGISTER_FORM)
            .await
            .assert_status_see_other();
        server
            .post(endpoints::LOG_IN)
            .form(&[("username", "grace"), ("password", "hunter2")])
            .await
            .assert_status_see_other();
        server.get(endpoints::DASHBOARD_VIEW).await.assert_status_ok();

        let response = server.get(endpoints::LOG_OUT).await;

        assert_redirect(&response, endpoints::LOG_IN);
        assert_redirect(
            &server.get(endpoints::DASHBOARD_VIEW).await,
            endpoints::LOG_IN,
        );
    }
}

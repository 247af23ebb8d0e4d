//! The registration page and the endpoint that creates a payroll user.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash,
    endpoints::payroll as endpoints,
    html::{base, form_card, form_error, link, password_input, submit_button, text_input},
    payroll::user::create_user,
};

/// The form data for creating a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

fn register_view(username: &str, error_message: Option<&str>) -> Markup {
    let register_form = html! {
        form action=(endpoints::REGISTER) method="post"
        {
            (form_error(error_message))
            (text_input("Username", "username", "text", username))
            (password_input("Password", "password", None))
            (submit_button("Register"))

            p
            {
                "Already registered? "
                (link(endpoints::ROOT, "Log in here"))
            }
        }
    };

    base("Register", "Payroll", &form_card("Create an Account", &register_form))
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    register_view("", None).into_response()
}

/// Create a user and redirect to the log-in page.
pub async fn register_payroll_user(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let password_hash = match PasswordHash::new(&form.password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return error.into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_user(&form.username, password_hash, &connection) {
        Ok(user) => {
            tracing::info!("Created payroll user {}", user.id);
            Redirect::to(endpoints::ROOT).into_response()
        }
        Err(Error::Duplicate(_)) => {
            register_view(&form.username, Some("Username already exists!")).into_response()
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod register_tests {
    use axum::http::StatusCode;

    use crate::{
        App,
        endpoints::payroll as endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input, assert_form_submit_button_with_text,
            assert_redirect, assert_valid_html, get_test_server, must_get_form, parse_html,
        },
    };

    use super::RegisterForm;

    #[tokio::test]
    async fn render_register_page() {
        let server = get_test_server(App::Payroll);

        let response = server.get(endpoints::REGISTER).await;

        response.assert_status_ok();
        let document = parse_html(&response.text());
        assert_valid_html(&document);
        let form = must_get_form(&document, endpoints::REGISTER);
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");
        assert_form_submit_button_with_text(&form, "Register");
    }

    #[tokio::test]
    async fn register_redirects_to_log_in_page() {
        let server = get_test_server(App::Payroll);

        let response = server
            .post(endpoints::REGISTER)
            .form(&RegisterForm {
                username: "clerk".to_owned(),
                password: "hunter2".to_owned(),
            })
            .await;

        assert_redirect(&response, endpoints::ROOT);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let server = get_test_server(App::Payroll);
        let form = RegisterForm {
            username: "clerk".to_owned(),
            password: "hunter2".to_owned(),
        };
        server
            .post(endpoints::REGISTER)
            .form(&form)
            .await
            .assert_status_see_other();

        let response = server.post(endpoints::REGISTER).form(&form).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let document = parse_html(&response.text());
        assert_form_error_message(&document, "Username already exists!");
    }
}

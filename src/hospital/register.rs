//! The registration page and the endpoint that creates a staff account.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash,
    endpoints::hospital as endpoints,
    hospital::user::{NewHospitalUser, create_user},
    html::{base, form_card, form_error, link, password_input, submit_button, text_input},
};

/// The form data for creating a staff account.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub username: String,
    pub password: String,
}

fn register_view(form: &RegisterForm, error_message: Option<&str>) -> Markup {
    let register_form = html! {
        form action=(endpoints::REGISTER) method="post"
        {
            (form_error(error_message))
            (text_input("Full Name", "full_name", "text", &form.full_name))
            (text_input("Email", "email", "email", &form.email))
            (text_input("Phone", "phone", "tel", &form.phone))
            (text_input("Role", "role", "text", &form.role))
            (text_input("Username", "username", "text", &form.username))
            (password_input("Password", "password", None))
            (submit_button("Register"))

            p
            {
                "Already registered? "
                (link(endpoints::LOG_IN, "Log in here"))
            }
        }
    };

    base("Register", "Hospital", &form_card("Staff Registration", &register_form))
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    register_view(&RegisterForm::default(), None).into_response()
}

/// Create a staff account and redirect to the log-in page.
pub async fn register_hospital_user(
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

    let new_user = NewHospitalUser {
        full_name: form.full_name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        role: form.role.clone(),
        username: form.username.clone(),
        password_hash,
    };

    match create_user(new_user, &connection) {
        Ok(user) => {
            tracing::info!("Registered {} as user {}", user.role, user.id);
            Redirect::to(endpoints::LOG_IN).into_response()
        }
        Err(Error::Duplicate(column)) if column == "hospital_user.email" => {
            register_view(&form, Some("Email already exists!")).into_response()
        }
        Err(Error::Duplicate(_)) => {
            register_view(&form, Some("Username already exists!")).into_response()
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
        endpoints::hospital as endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input, assert_redirect, assert_valid_html,
            get_test_server, must_get_form, parse_html,
        },
    };

    use super::RegisterForm;

    fn register_form(username: &str, email: &str) -> RegisterForm {
        RegisterForm {
            full_name: "Grace Hopper".to_owned(),
            email: email.to_owned(),
            phone: "555-0100".to_owned(),
            role: "Receptionist".to_owned(),
            username: username.to_owned(),
            password: "hunter2".to_owned(),
        }
    }

    #[tokio::test]
    async fn render_register_page() {
        let server = get_test_server(App::Hospital);

        let response = server.get(endpoints::REGISTER).await;

        response.assert_status_ok();
        let document = parse_html(&response.text());
        assert_valid_html(&document);
        let form = must_get_form(&document, endpoints::REGISTER);
        assert_form_input(&form, "full_name", "text");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "phone", "tel");
        assert_form_input(&form, "role", "text");
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");
    }

    #[tokio::test]
    async fn register_redirects_to_log_in() {
        let server = get_test_server(App::Hospital);

        let response = server
            .post(endpoints::REGISTER)
            .form(&register_form("grace", "grace@example.com"))
            .await;

        assert_redirect(&response, endpoints::LOG_IN);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let server = get_test_server(App::Hospital);
        server
            .post(endpoints::REGISTER)
            .form(&register_form("grace", "grace@example.com"))
            .await
            .assert_status_see_other();

        let response = server
            .post(endpoints::REGISTER)
            .form(&register_form("grace", "other@example.com"))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_form_error_message(&parse_html(&response.text()), "Username already exists!");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let server = get_test_server(App::Hospital);
        server
            .post(endpoints::REGISTER)
            .form(&register_form("grace", "grace@example.com"))
            .await
            .assert_status_see_other();

        let response = server
            .post(endpoints::REGISTER)
            .form(&register_form("hopper", "grace@example.com"))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_form_error_message(&parse_html(&response.text()), "Email already exists!");
    }
}

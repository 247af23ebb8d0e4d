//! The sign-up page and the endpoint that opens a new account.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash,
    bank::user::{NewBankUser, create_user},
    endpoints::bank as endpoints,
    html::{base, form_card, form_error, link, password_input, submit_button, text_input},
};

/// The form data for opening an account.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub pin: String,
    /// The PIN entered a second time.
    pub cpin: String,
    pub age: u32,
    pub account_number: String,
    pub branch: String,
}

fn sign_up_view(form: &RegisterForm, error_message: Option<&str>) -> Markup {
    let age = if form.age == 0 {
        String::new()
    } else {
        form.age.to_string()
    };

    let sign_up_form = html! {
        form action=(endpoints::REGISTER) method="post"
        {
            (form_error(error_message))
            (text_input("Full Name", "name", "text", &form.name))
            (password_input("PIN", "pin", None))
            (password_input("Confirm PIN", "cpin", None))
            (text_input("Age", "age", "number", &age))
            (text_input("Account Number", "account_number", "text", &form.account_number))
            (text_input("Branch", "branch", "text", &form.branch))
            (submit_button("Sign Up"))

            p
            {
                "Already have an account? "
                (link(endpoints::SIGN_IN_VIEW, "Sign in here"))
            }
        }
    };

    base("Sign Up", "Bank", &form_card("Open an Account", &sign_up_form))
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Response {
    sign_up_view(&RegisterForm::default(), None).into_response()
}

/// Open a new account and redirect to the sign-in page.
///
/// The form is shown again with an error message if the PINs differ or the
/// account number is taken.
pub async fn register_bank_user(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.pin != form.cpin {
        return sign_up_view(&form, Some("PINs do not match")).into_response();
    }

    let pin_hash = match PasswordHash::new(&form.pin, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a PIN: {error}");
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

    let new_user = NewBankUser {
        name: form.name.clone(),
        pin_hash,
        age: form.age,
        account_number: form.account_number.clone(),
        branch: form.branch.clone(),
    };

    match create_user(new_user, &connection) {
        Ok(user) => {
            tracing::info!("Opened account {} for user {}", user.account_number, user.id);
            Redirect::to(endpoints::SIGN_IN_VIEW).into_response()
        }
        Err(Error::Duplicate(_)) => sign_up_view(
            &form,
            Some("Account number already exists. Please choose another."),
        )
        .into_response(),
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
        endpoints::bank as endpoints,
        test_utils::{
            assert_form_action, assert_form_error_message, assert_form_input,
            assert_form_submit_button_with_text, assert_redirect, assert_valid_html,
            get_test_server, must_get_form, parse_html,
        },
    };

    use super::RegisterForm;

    fn register_form(account_number: &str) -> RegisterForm {
        RegisterForm {
            name: "Alice".to_owned(),
            pin: "1234".to_owned(),
            cpin: "1234".to_owned(),
            age: 30,
            account_number: account_number.to_owned(),
            branch: "Central".to_owned(),
        }
    }

    #[tokio::test]
    async fn render_sign_up_page() {
        let server = get_test_server(App::Bank);

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        let document = parse_html(&response.text());
        assert_valid_html(&document);
        let form = must_get_form(&document, endpoints::REGISTER);
        assert_form_action(&form, endpoints::REGISTER);
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "pin", "password");
        assert_form_input(&form, "cpin", "password");
        assert_form_input(&form, "age", "number");
        assert_form_input(&form, "account_number", "text");
        assert_form_input(&form, "branch", "text");
        assert_form_submit_button_with_text(&form, "Sign Up");
    }

    #[tokio::test]
    async fn register_redirects_to_sign_in() {
        let server = get_test_server(App::Bank);

        let response = server
            .post(endpoints::REGISTER)
            .form(&register_form("ACC-1"))
            .await;

        assert_redirect(&response, endpoints::SIGN_IN_VIEW);
    }

    #[tokio::test]
    async fn register_fails_when_pins_do_not_match() {
        let server = get_test_server(App::Bank);
        let mut form = register_form("ACC-1");
        form.cpin = "4321".to_owned();

        let response = server.post(endpoints::REGISTER).form(&form).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let document = parse_html(&response.text());
        assert_form_error_message(&document, "PINs do not match");
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_account_number() {
        let server = get_test_server(App::Bank);
        server
            .post(endpoints::REGISTER)
            .form(&register_form("ACC-1"))
            .await
            .assert_status_see_other();

        let response = server
            .post(endpoints::REGISTER)
            .form(&register_form("ACC-1"))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let document = parse_html(&response.text());
        assert_form_error_message(
            &document,
            "Account number already exists. Please choose another.",
        );

        // The first account can still sign in.
        server
            .post(endpoints::LOG_IN)
            .form(&[("account_number", "ACC-1"), ("pin", "1234")])
            .await
            .assert_status_see_other();
    }
}

//! A set of small management system web apps served over HTTP.
//!
//! Each app lives in its own module and owns its SQLite schema and routes:
//! - [bank]: customer accounts with a deposit/withdrawal ledger.
//! - [payroll]: employees and their salaries.
//! - [hospital]: doctors and appointment booking.
//! - [inventory]: static product catalogue pages.
//! - [library]: a JSON API for books, members and borrow/return records.
//!
//! The apps share session cookies, password hashing, the HTML page shell and
//! the request logging middleware.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app;
mod app_state;
mod auth;
pub mod bank;
mod database_id;
mod endpoints;
pub mod hospital;
mod html;
mod internal_server_error;
pub mod inventory;
pub mod library;
mod logging;
mod not_found;
pub mod payroll;

#[cfg(test)]
mod test_utils;

pub use app::App;
pub use app_state::{AppState, create_cookie_key};
pub use auth::PasswordHash;
pub use database_id::{DatabaseId, UserID};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};

use crate::{internal_server_error::InternalServerError, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The supplied secret did not match the stored hash, or no user matched
    /// the supplied identifier.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// The auth cookie could not be decoded, or its token has expired.
    #[error("the auth token is invalid or has expired")]
    InvalidToken,

    /// There was an error formatting or computing a cookie expiry date time.
    #[error("could not compute the cookie expiry: {0}")]
    DateError(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A UNIQUE constraint failed.
    ///
    /// Holds the `table.column` that caused the violation, e.g.
    /// "bank_user.account_number".
    #[error("the value for {0} already exists in the database")]
    Duplicate(String),

    /// A query was given a foreign key that does not refer to an existing row.
    #[error("the referenced row does not exist")]
    InvalidForeignKey,

    /// A library borrow or return named neither a book title nor a book ID.
    #[error("a borrow or return must name a book title or a book_id")]
    MissingBookReference,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 =>
            {
                let column = desc
                    .rsplit_once(": ")
                    .map(|(_, column)| column)
                    .unwrap_or(desc);

                Error::Duplicate(column.to_owned())
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidForeignKey
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidCredentials | Error::CookieMissing | Error::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into a JSON response of the form `{"message": ...}`.
    ///
    /// Used by routes that serve JSON instead of HTML pages.
    pub fn into_json_response(self) -> Response {
        let (status_code, message) = match self {
            Error::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
            Error::Duplicate(column) => (
                StatusCode::CONFLICT,
                format!("The value for {column} already exists"),
            ),
            Error::InvalidForeignKey => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "The referenced record does not exist".to_owned(),
            ),
            Error::MissingBookReference => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Provide a book title or a book_id".to_owned(),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Try again later or check the server logs".to_owned(),
                )
            }
        };

        (status_code, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;
    use rusqlite::Connection;

    use crate::Error;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute_batch(
                "PRAGMA foreign_keys = ON;
                CREATE TABLE parent (id INTEGER PRIMARY KEY, code TEXT NOT NULL UNIQUE);
                CREATE TABLE child (id INTEGER PRIMARY KEY, parent_id INTEGER NOT NULL REFERENCES parent(id));",
            )
            .unwrap();
        connection
    }

    #[test]
    fn unique_violation_maps_to_duplicate_with_column() {
        let connection = get_test_connection();
        connection
            .execute("INSERT INTO parent (code) VALUES ('a')", ())
            .unwrap();

        let error: Error = connection
            .execute("INSERT INTO parent (code) VALUES ('a')", ())
            .unwrap_err()
            .into();

        assert_eq!(error, Error::Duplicate("parent.code".to_owned()));
    }

    #[test]
    fn foreign_key_violation_maps_to_invalid_foreign_key() {
        let connection = get_test_connection();

        let error: Error = connection
            .execute("INSERT INTO child (parent_id) VALUES (42)", ())
            .unwrap_err()
            .into();

        assert_eq!(error, Error::InvalidForeignKey);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let connection = get_test_connection();

        let error: Error = connection
            .query_row("SELECT id FROM parent WHERE id = 1", (), |row| {
                row.get::<_, i64>(0)
            })
            .unwrap_err()
            .into();

        assert_eq!(error, Error::NotFound);
    }

    #[tokio::test]
    async fn json_response_carries_status_and_message() {
        let response = Error::NotFound.into_json_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Not found"}));
    }

    #[test]
    fn lock_error_is_internal_server_error_json() {
        let response = Error::DatabaseLockError.into_json_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

use axum_test::{TestResponse, TestServer};
use rusqlite::Connection;

use crate::{App, AppState, create_cookie_key};

#[track_caller]
pub(crate) fn assert_redirect(response: &TestResponse, location: &str) {
    response.assert_status_see_other();
    assert_eq!(response.header("location"), location);
}

/// An in-memory database with the tables for `app`.
pub(crate) fn get_test_connection(app: App) -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    app.initialize_db(&connection)
        .expect("Could not initialize database");

    connection
}

/// A test server for `app` backed by an in-memory database.
pub(crate) fn get_test_server(app: App) -> TestServer {
    let state = AppState::new(
        Connection::open_in_memory().expect("Could not open in-memory SQLite database"),
        create_cookie_key("42"),
        app,
    )
    .expect("Could not create app state");

    TestServer::new(app.build_router(state))
}

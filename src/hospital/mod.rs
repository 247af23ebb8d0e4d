//! A hospital scheduler: staff register and log in, then book appointments
//! with one of the hospital's doctors.

mod appointment;
mod dashboard;
mod doctor;
mod log_in;
mod register;
mod user;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{AuthState, auth_guard},
    endpoints::hospital as endpoints,
    not_found::get_404_not_found,
};

use dashboard::{book_appointment_endpoint, get_dashboard_page};
use log_in::{get_log_in_page, log_in_hospital_user, log_out_hospital_user, redirect_to_log_in};
use register::{get_register_page, register_hospital_user};

/// Create the staff, doctor and appointment tables if they do not exist, and
/// add the sample doctors to an empty doctor table.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    user::create_user_table(connection)?;
    doctor::create_doctor_table(connection)?;
    appointment::create_appointment_table(connection)?;
    doctor::seed_doctors(connection)
}

/// Return a router with all the hospital routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(redirect_to_log_in))
        .route(
            endpoints::REGISTER,
            get(get_register_page).post(register_hospital_user),
        )
        .route(
            endpoints::LOG_IN,
            get(get_log_in_page).post(log_in_hospital_user),
        )
        .route(endpoints::LOG_OUT, get(log_out_hospital_user));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::BOOK_APPOINTMENT, post(book_appointment_endpoint))
        .layer(middleware::from_fn_with_state(
            AuthState::new(&state, endpoints::LOG_IN),
            auth_guard,
        ));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

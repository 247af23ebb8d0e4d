//! An employee payroll: clerks register and log in, then add employees and
//! see the total salary bill.

mod dashboard;
mod employee;
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
    endpoints::payroll as endpoints,
    not_found::get_404_not_found,
};

pub use employee::{Employee, total_salary};

use dashboard::{add_employee_endpoint, get_dashboard_page};
use log_in::{get_log_in_page, log_in_payroll_user, log_out_payroll_user};
use register::{get_register_page, register_payroll_user};

/// Create the user and employee tables if they do not exist.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    user::create_user_table(connection)?;
    employee::create_employee_table(connection)?;

    Ok(())
}

/// Return a router with all the payroll routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_log_in_page))
        .route(
            endpoints::REGISTER,
            get(get_register_page).post(register_payroll_user),
        )
        .route(endpoints::LOG_IN, post(log_in_payroll_user))
        .route(endpoints::LOG_OUT, get(log_out_payroll_user));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::ADD_EMPLOYEE, post(add_employee_endpoint))
        .layer(middleware::from_fn_with_state(
            AuthState::new(&state, endpoints::ROOT),
            auth_guard,
        ));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

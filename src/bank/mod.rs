//! A banking ledger: customers open an account, sign in with their account
//! number and PIN, and record deposits and withdrawals.
//!
//! The balance is never stored. It is recomputed from the full ledger every
//! time the dashboard is shown.

mod balance;
mod dashboard;
mod log_in;
mod register;
mod transaction;
mod transaction_endpoint;
mod user;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{AuthState, auth_guard},
    endpoints::bank as endpoints,
    not_found::get_404_not_found,
};

pub use balance::balance;
pub use transaction::{Transaction, TransactionKind};
pub use user::BankUser;

use dashboard::get_dashboard_page;
use log_in::{get_sign_in_page, log_in_bank_user, log_out_bank_user};
use register::{get_sign_up_page, register_bank_user};
use transaction_endpoint::{deposit_endpoint, withdraw_endpoint};

/// Create the customer and ledger tables if they do not exist.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    user::create_user_table(connection)?;
    transaction::create_transaction_table(connection)?;

    Ok(())
}

/// Return a router with all the banking routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_sign_up_page))
        .route(endpoints::REGISTER, post(register_bank_user))
        .route(endpoints::SIGN_IN_VIEW, get(get_sign_in_page))
        .route(endpoints::LOG_IN, post(log_in_bank_user))
        .route(endpoints::LOG_OUT, get(log_out_bank_user));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DEPOSIT, post(deposit_endpoint))
        .route(endpoints::WITHDRAW, post(withdraw_endpoint))
        .layer(middleware::from_fn_with_state(
            AuthState::new(&state, endpoints::SIGN_IN_VIEW),
            auth_guard,
        ));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

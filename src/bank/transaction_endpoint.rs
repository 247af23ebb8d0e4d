//! Defines the endpoints for depositing and withdrawing money.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, UserID,
    bank::{TransactionKind, transaction::create_transaction},
    endpoints::bank as endpoints,
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for a deposit or withdrawal.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The amount in dollars.
    pub amount: f64,
    /// An optional description, replaced by a default when blank.
    #[serde(default)]
    pub label: String,
}

/// A route handler for depositing money, redirects to the dashboard.
pub async fn deposit_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    record_transaction(&state, user_id, TransactionKind::Deposit, form)
}

/// A route handler for withdrawing money, redirects to the dashboard.
pub async fn withdraw_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    record_transaction(&state, user_id, TransactionKind::Withdrawal, form)
}

fn record_transaction(
    state: &TransactionState,
    user_id: UserID,
    kind: TransactionKind,
    form: TransactionForm,
) -> Response {
    let label = match form.label.trim() {
        "" => kind.default_label(),
        label => label,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_transaction(user_id, kind, form.amount, label, &connection) {
        Ok(transaction) => {
            tracing::debug!("Recorded {kind} {} for user {user_id}", transaction.id);
            Redirect::to(endpoints::DASHBOARD_VIEW).into_response()
        }
        Err(error) => {
            tracing::error!("Could not record {kind} of {} for user {user_id}: {error}", form.amount);
            error.into_response()
        }
    }
}

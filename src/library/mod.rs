//! A library catalogue served as a JSON API: books, members, and the borrow
//! and return records that mark books as out or back on the shelf.
//!
//! None of the routes require a log-in.

mod book;
mod catalog_page;
mod member;
mod transaction;

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::FromRef,
    routing::{delete, get},
};
use rusqlite::Connection;

use crate::{AppState, Error, endpoints::library as endpoints, not_found::get_404_not_found};

pub use book::Book;
pub use member::Member;
pub use transaction::{LibraryTransaction, LibraryTransactionKind};

use book::{create_book_endpoint, delete_book_endpoint, get_books_endpoint};
use catalog_page::get_catalog_page;
use member::{create_member_endpoint, delete_member_endpoint, get_members_endpoint};
use transaction::{create_transaction_endpoint, get_transactions_endpoint};

/// The state needed by the library routes.
#[derive(Debug, Clone)]
pub struct LibraryState {
    /// The database connection for the catalogue.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LibraryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create the book, member and transaction tables if they do not exist.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    book::create_book_table(connection)?;
    member::create_member_table(connection)?;
    transaction::create_transaction_table(connection)?;

    Ok(())
}

/// Return a router with all the library routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_catalog_page))
        .route(
            endpoints::BOOKS,
            get(get_books_endpoint).post(create_book_endpoint),
        )
        .route(endpoints::BOOK, delete(delete_book_endpoint))
        .route(
            endpoints::MEMBERS,
            get(get_members_endpoint).post(create_member_endpoint),
        )
        .route(endpoints::MEMBER, delete(delete_member_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

//! Borrow and return records, and the availability toggle they drive.
//!
//! Recording a borrow marks the book as out and recording a return marks it
//! as back on the shelf. The previous state is never checked, so borrowing a
//! book twice is accepted.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{DatabaseId, Error, library::LibraryState};

/// Whether a book left or came back to the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LibraryTransactionKind {
    /// The book was lent to a member.
    Borrow,
    /// The book was brought back.
    Return,
}

impl LibraryTransactionKind {
    fn as_str(&self) -> &'static str {
        match self {
            LibraryTransactionKind::Borrow => "Borrow",
            LibraryTransactionKind::Return => "Return",
        }
    }

    /// The value of the `available` flag after a transaction of this kind.
    fn available_after(&self) -> bool {
        matches!(self, LibraryTransactionKind::Return)
    }
}

impl ToSql for LibraryTransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for LibraryTransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "Borrow" => Ok(LibraryTransactionKind::Borrow),
            "Return" => Ok(LibraryTransactionKind::Return),
            other => Err(FromSqlError::Other(
                format!("unknown library transaction kind {other:?}").into(),
            )),
        }
    }
}

/// A borrow or return record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryTransaction {
    /// The record's ID in the application database.
    pub id: DatabaseId,
    /// The title of the book, if the client gave one.
    pub book: Option<String>,
    /// The specific copy, if the client named one.
    pub book_id: Option<DatabaseId>,
    /// The name of the member.
    pub member: Option<String>,
    /// Whether the book was borrowed or returned.
    #[serde(rename = "type")]
    pub kind: LibraryTransactionKind,
    /// When the book was borrowed or returned.
    pub date: Option<String>,
    /// When a borrowed book should be returned.
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    /// Free text status, e.g. "On time" or "Overdue".
    pub status: Option<String>,
    /// The condition of the book, e.g. "Good".
    pub condition: Option<String>,
}

/// The JSON body for recording a borrow or return.
///
/// At least one of `book` and `book_id` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLibraryTransaction {
    #[serde(default)]
    pub book: Option<String>,
    #[serde(default)]
    pub book_id: Option<DatabaseId>,
    #[serde(default)]
    pub member: Option<String>,
    #[serde(rename = "type")]
    pub kind: LibraryTransactionKind,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, rename = "dueDate")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS library_transaction (
                id INTEGER PRIMARY KEY,
                book TEXT,
                book_id INTEGER,
                member TEXT,
                kind TEXT NOT NULL CHECK(kind IN ('Borrow','Return')),
                date TEXT,
                due_date TEXT,
                status TEXT,
                condition TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Record a borrow or return and update the availability of the book in a
/// single database transaction.
///
/// If `book_id` is set only that book is updated, otherwise every book whose
/// title equals `book` is updated.
///
/// # Errors
///
/// Returns [Error::MissingBookReference] if neither `book` nor `book_id` is
/// set. Nothing is written if any statement fails.
pub fn create_transaction(
    new_transaction: &NewLibraryTransaction,
    connection: &mut Connection,
) -> Result<LibraryTransaction, Error> {
    if new_transaction.book.is_none() && new_transaction.book_id.is_none() {
        return Err(Error::MissingBookReference);
    }

    let transaction = connection.transaction()?;

    transaction.execute(
        "INSERT INTO library_transaction
        (book, book_id, member, kind, date, due_date, status, condition)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            &new_transaction.book,
            new_transaction.book_id,
            &new_transaction.member,
            new_transaction.kind,
            &new_transaction.date,
            &new_transaction.due_date,
            &new_transaction.status,
            &new_transaction.condition,
        ),
    )?;
    let id = transaction.last_insert_rowid();

    let available = new_transaction.kind.available_after();
    let books_updated = match (new_transaction.book_id, &new_transaction.book) {
        (Some(book_id), _) => transaction.execute(
            "UPDATE book SET available = ?1 WHERE id = ?2",
            (available, book_id),
        )?,
        (None, Some(title)) => transaction.execute(
            "UPDATE book SET available = ?1 WHERE title = ?2",
            (available, title),
        )?,
        (None, None) => 0,
    };

    transaction.commit()?;

    tracing::debug!(
        "{} of {:?} (id {:?}) set available = {available} on {books_updated} book(s)",
        new_transaction.kind.as_str(),
        new_transaction.book,
        new_transaction.book_id
    );

    Ok(LibraryTransaction {
        id,
        book: new_transaction.book.clone(),
        book_id: new_transaction.book_id,
        member: new_transaction.member.clone(),
        kind: new_transaction.kind,
        date: new_transaction.date.clone(),
        due_date: new_transaction.due_date.clone(),
        status: new_transaction.status.clone(),
        condition: new_transaction.condition.clone(),
    })
}

fn map_row_to_transaction(row: &Row) -> Result<LibraryTransaction, rusqlite::Error> {
    Ok(LibraryTransaction {
        id: row.get(0)?,
        book: row.get(1)?,
        book_id: row.get(2)?,
        member: row.get(3)?,
        kind: row.get(4)?,
        date: row.get(5)?,
        due_date: row.get(6)?,
        status: row.get(7)?,
        condition: row.get(8)?,
    })
}

/// Get every borrow and return record in the order they were made.
pub fn get_transactions(connection: &Connection) -> Result<Vec<LibraryTransaction>, Error> {
    connection
        .prepare(
            "SELECT id, book, book_id, member, kind, date, due_date, status, condition
            FROM library_transaction ORDER BY id",
        )?
        .query_map([], map_row_to_transaction)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// A route handler that lists every borrow and return record as JSON.
pub async fn get_transactions_endpoint(State(state): State<LibraryState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match get_transactions(&connection) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// A route handler for recording a borrow or return, responds with 201 Created.
pub async fn create_transaction_endpoint(
    State(state): State<LibraryState>,
    Json(new_transaction): Json<NewLibraryTransaction>,
) -> Response {
    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match create_transaction(&new_transaction, &mut connection) {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!({"message": "Transaction added"})),
        )
            .into_response(),
        Err(Error::MissingBookReference) => Error::MissingBookReference.into_json_response(),
        Err(error) => {
            tracing::error!("Could not record {new_transaction:?}: {error}");
            error.into_json_response()
        }
    }
}

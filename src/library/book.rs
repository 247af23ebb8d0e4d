//! The library's books and the JSON endpoints for managing them.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{DatabaseId, Error, library::LibraryState};

mod availability_format {
    //! The `available` flag travels as 0 or 1 on the wire, matching how it is
    //! stored. JSON booleans are accepted on input too.
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    pub fn serialize<S>(available: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(u8::from(*available))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Flag::deserialize(deserializer)? {
            Flag::Bool(available) => Ok(available),
            Flag::Int(0) => Ok(false),
            Flag::Int(1) => Ok(true),
            Flag::Int(other) => Err(de::Error::custom(format!(
                "available must be 0 or 1, got {other}"
            ))),
        }
    }
}

/// A book in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// The book's ID in the application database.
    pub id: DatabaseId,
    /// The title, which borrow and return records refer to.
    pub title: String,
    /// The author's name.
    pub author: Option<String>,
    /// The ISBN printed on the book.
    pub isbn: Option<String>,
    /// The genre or shelf, e.g. "Fiction".
    pub category: Option<String>,
    /// The year of publication.
    pub year: Option<i64>,
    /// Whether the book is on the shelf, sent as 0 or 1.
    #[serde(with = "availability_format")]
    pub available: bool,
}

/// The JSON body for adding a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(
        default = "default_available",
        deserialize_with = "availability_format::deserialize"
    )]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

pub fn create_book_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS book (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                author TEXT,
                isbn TEXT,
                category TEXT,
                year INTEGER,
                available INTEGER NOT NULL DEFAULT 1
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_book_title ON book(title)",
        (),
    )?;

    Ok(())
}

pub fn create_book(new_book: &NewBook, connection: &Connection) -> Result<Book, Error> {
    connection.execute(
        "INSERT INTO book (title, author, isbn, category, year, available)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            &new_book.title,
            &new_book.author,
            &new_book.isbn,
            &new_book.category,
            new_book.year,
            new_book.available,
        ),
    )?;

    Ok(Book {
        id: connection.last_insert_rowid(),
        title: new_book.title.clone(),
        author: new_book.author.clone(),
        isbn: new_book.isbn.clone(),
        category: new_book.category.clone(),
        year: new_book.year,
        available: new_book.available,
    })
}

fn map_row_to_book(row: &Row) -> Result<Book, rusqlite::Error> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        isbn: row.get(3)?,
        category: row.get(4)?,
        year: row.get(5)?,
        available: row.get(6)?,
    })
}

pub fn get_books(connection: &Connection) -> Result<Vec<Book>, Error> {
    connection
        .prepare("SELECT id, title, author, isbn, category, year, available FROM book ORDER BY id")?
        .query_map([], map_row_to_book)?
        .map(|book_result| book_result.map_err(Error::from))
        .collect()
}

type RowsAffected = usize;

pub fn delete_book(id: DatabaseId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM book WHERE id = ?1", (id,))
        .map_err(|error| error.into())
}

/// A route handler that lists every book as JSON.
pub async fn get_books_endpoint(State(state): State<LibraryState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match get_books(&connection) {
        Ok(books) => Json(books).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// A route handler for adding a book, responds with 201 Created.
pub async fn create_book_endpoint(
    State(state): State<LibraryState>,
    Json(new_book): Json<NewBook>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match create_book(&new_book, &connection) {
        Ok(book) => {
            tracing::debug!("Added book {}", book.id);
            (StatusCode::CREATED, Json(json!({"message": "Book added"}))).into_response()
        }
        Err(error) => {
            tracing::error!("Could not add book {new_book:?}: {error}");
            error.into_json_response()
        }
    }
}

/// A route handler for deleting a book, responds with 404 if the book does not exist.
pub async fn delete_book_endpoint(
    State(state): State<LibraryState>,
    Path(book_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match delete_book(book_id, &connection) {
        Ok(rows_affected) if rows_affected != 0 => {
            Json(json!({"message": "Book deleted"})).into_response()
        }
        Ok(_) => Error::NotFound.into_json_response(),
        Err(error) => {
            tracing::error!("Could not delete book {book_id}: {error}");
            error.into_json_response()
        }
    }
}

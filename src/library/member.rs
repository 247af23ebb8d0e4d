//! Library members and the JSON endpoints for managing them.

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

/// A person registered with the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// The member's ID in the application database.
    pub id: DatabaseId,
    /// The member's name, which borrow and return records refer to.
    pub name: String,
    /// Contact details, all optional.
    pub email: Option<String>,
    /// The member's phone number.
    pub phone: Option<String>,
    /// The member's postal address.
    pub address: Option<String>,
    /// New members are "Active".
    pub status: String,
}

/// The JSON body for adding a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

pub fn create_member_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS member (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT,
                phone TEXT,
                address TEXT,
                status TEXT NOT NULL DEFAULT 'Active'
                )",
        (),
    )?;

    Ok(())
}

/// Add a member with the status "Active".
pub fn create_member(new_member: &NewMember, connection: &Connection) -> Result<Member, Error> {
    let member = connection.query_row(
        "INSERT INTO member (name, email, phone, address) VALUES (?1, ?2, ?3, ?4)
        RETURNING id, name, email, phone, address, status",
        (
            &new_member.name,
            &new_member.email,
            &new_member.phone,
            &new_member.address,
        ),
        map_row_to_member,
    )?;

    Ok(member)
}

fn map_row_to_member(row: &Row) -> Result<Member, rusqlite::Error> {
    Ok(Member {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        status: row.get(5)?,
    })
}

pub fn get_members(connection: &Connection) -> Result<Vec<Member>, Error> {
    connection
        .prepare("SELECT id, name, email, phone, address, status FROM member ORDER BY id")?
        .query_map([], map_row_to_member)?
        .map(|member_result| member_result.map_err(Error::from))
        .collect()
}

type RowsAffected = usize;

pub fn delete_member(id: DatabaseId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM member WHERE id = ?1", (id,))
        .map_err(|error| error.into())
}

/// A route handler that lists every member as JSON.
pub async fn get_members_endpoint(State(state): State<LibraryState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match get_members(&connection) {
        Ok(members) => Json(members).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// A route handler for adding a member, responds with 201 Created.
pub async fn create_member_endpoint(
    State(state): State<LibraryState>,
    Json(new_member): Json<NewMember>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match create_member(&new_member, &connection) {
        Ok(member) => {
            tracing::debug!("Added member {}", member.id);
            (StatusCode::CREATED, Json(json!({"message": "Member added"}))).into_response()
        }
        Err(error) => {
            tracing::error!("Could not add member {new_member:?}: {error}");
            error.into_json_response()
        }
    }
}

/// A route handler for deleting a member, responds with 404 if the member does not exist.
pub async fn delete_member_endpoint(
    State(state): State<LibraryState>,
    Path(member_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match delete_member(member_id, &connection) {
        Ok(rows_affected) if rows_affected != 0 => {
            Json(json!({"message": "Member deleted"})).into_response()
        }
        Ok(_) => Error::NotFound.into_json_response(),
        Err(error) => {
            tracing::error!("Could not delete member {member_id}: {error}");
            error.into_json_response()
        }
    }
}

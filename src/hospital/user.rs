//! Hospital staff accounts.

use rusqlite::{Connection, Row};

use crate::{Error, PasswordHash, UserID};

/// A member of staff that can log in.
#[derive(Debug, Clone, PartialEq)]
pub struct HospitalUser {
    pub id: UserID,
    pub full_name: String,
    /// Unique across all users.
    pub email: String,
    pub phone: String,
    /// The user's job, e.g. "Doctor" or "Receptionist".
    pub role: String,
    /// The name used to log in, unique across all users.
    pub username: String,
    pub password_hash: PasswordHash,
}

/// The details needed to register a user.
#[derive(Debug, Clone)]
pub struct NewHospitalUser {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub username: String,
    pub password_hash: PasswordHash,
}

pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS hospital_user (
                id INTEGER PRIMARY KEY,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT NOT NULL,
                role TEXT NOT NULL,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::Duplicate] holding "hospital_user.username" or
/// "hospital_user.email" if either is already taken.
pub fn create_user(new_user: NewHospitalUser, connection: &Connection) -> Result<HospitalUser, Error> {
    connection.execute(
        "INSERT INTO hospital_user (full_name, email, phone, role, username, password_hash)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            &new_user.full_name,
            &new_user.email,
            &new_user.phone,
            &new_user.role,
            &new_user.username,
            new_user.password_hash.as_ref(),
        ),
    )?;

    Ok(HospitalUser {
        id: UserID::new(connection.last_insert_rowid()),
        full_name: new_user.full_name,
        email: new_user.email,
        phone: new_user.phone,
        role: new_user.role,
        username: new_user.username,
        password_hash: new_user.password_hash,
    })
}

const SELECT_USER: &str =
    "SELECT id, full_name, email, phone, role, username, password_hash FROM hospital_user";

fn map_row_to_user(row: &Row) -> Result<HospitalUser, rusqlite::Error> {
    let raw_password_hash: String = row.get(6)?;

    Ok(HospitalUser {
        id: UserID::new(row.get(0)?),
        full_name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        role: row.get(4)?,
        username: row.get(5)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<HospitalUser, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE username = :username"))?
        .query_row(&[(":username", username)], map_row_to_user)
        .map_err(|error| error.into())
}

pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<HospitalUser, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_row_to_user)
        .map_err(|error| error.into())
}

/// Get every registered user in the order they registered.
pub fn get_users(connection: &Connection) -> Result<Vec<HospitalUser>, Error> {
    connection
        .prepare(&format!("{SELECT_USER} ORDER BY id"))?
        .query_map([], map_row_to_user)?
        .map(|user_result| user_result.map_err(Error::from))
        .collect()
}

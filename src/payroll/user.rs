//! The payroll clerks that log in to manage employees.

use rusqlite::{Connection, Row};

use crate::{Error, PasswordHash, UserID};

/// A user of the payroll app.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollUser {
    pub id: UserID,
    /// The name used to log in, unique across all users.
    pub username: String,
    pub password_hash: PasswordHash,
}

pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS payroll_user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::Duplicate] if `username` is taken.
pub fn create_user(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<PayrollUser, Error> {
    connection.execute(
        "INSERT INTO payroll_user (username, password_hash) VALUES (?1, ?2)",
        (username, password_hash.as_ref()),
    )?;

    Ok(PayrollUser {
        id: UserID::new(connection.last_insert_rowid()),
        username: username.to_owned(),
        password_hash,
    })
}

fn map_row_to_user(row: &Row) -> Result<PayrollUser, rusqlite::Error> {
    let raw_password_hash: String = row.get(2)?;

    Ok(PayrollUser {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<PayrollUser, Error> {
    connection
        .prepare("SELECT id, username, password_hash FROM payroll_user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_row_to_user)
        .map_err(|error| error.into())
}

pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<PayrollUser, Error> {
    connection
        .prepare("SELECT id, username, password_hash FROM payroll_user WHERE username = :username")?
        .query_row(&[(":username", username)], map_row_to_user)
        .map_err(|error| error.into())
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{Error, PasswordHash};

    use super::{create_user, create_user_table, get_user_by_id, get_user_by_username};

    fn get_db_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        connection
    }

    #[test]
    fn insert_user_succeeds() {
        let connection = get_db_connection();

        let user = create_user("clerk", PasswordHash::new_unchecked("hash"), &connection).unwrap();

        assert_eq!(get_user_by_id(user.id, &connection), Ok(user.clone()));
        assert_eq!(get_user_by_username("clerk", &connection), Ok(user));
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let connection = get_db_connection();
        create_user("clerk", PasswordHash::new_unchecked("hash"), &connection).unwrap();

        let result = create_user("clerk", PasswordHash::new_unchecked("other"), &connection);

        assert_eq!(
            result,
            Err(Error::Duplicate("payroll_user.username".to_owned()))
        );
    }

    #[test]
    fn unknown_username_is_not_found() {
        let connection = get_db_connection();

        assert_eq!(
            get_user_by_username("nobody", &connection),
            Err(Error::NotFound)
        );
    }
}

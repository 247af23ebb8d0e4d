//! Bank customers: the account holders that log in with an account number and PIN.

use rusqlite::{Connection, Row};

use crate::{Error, PasswordHash, UserID};

/// A customer of the bank.
#[derive(Debug, Clone, PartialEq)]
pub struct BankUser {
    /// The customer's ID in the application database.
    pub id: UserID,
    /// The customer's full name.
    pub name: String,
    /// The hash of the customer's PIN.
    pub pin_hash: PasswordHash,
    /// The customer's age in years.
    pub age: u32,
    /// The account number, unique across all customers.
    pub account_number: String,
    /// The branch where the account was opened.
    pub branch: String,
}

/// The details needed to open a new account.
#[derive(Debug, Clone)]
pub struct NewBankUser {
    pub name: String,
    pub pin_hash: PasswordHash,
    pub age: u32,
    pub account_number: String,
    pub branch: String,
}

pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS bank_user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                pin_hash TEXT NOT NULL,
                age INTEGER,
                account_number TEXT NOT NULL UNIQUE,
                branch TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new customer into the database.
///
/// # Errors
///
/// Returns [Error::Duplicate] if the account number is already taken, or
/// [Error::SqlError] if some other SQL error occurred.
pub fn create_user(new_user: NewBankUser, connection: &Connection) -> Result<BankUser, Error> {
    connection.execute(
        "INSERT INTO bank_user (name, pin_hash, age, account_number, branch)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &new_user.name,
            new_user.pin_hash.as_ref(),
            new_user.age,
            &new_user.account_number,
            &new_user.branch,
        ),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(BankUser {
        id,
        name: new_user.name,
        pin_hash: new_user.pin_hash,
        age: new_user.age,
        account_number: new_user.account_number,
        branch: new_user.branch,
    })
}

fn map_row_to_user(row: &Row) -> Result<BankUser, rusqlite::Error> {
    let raw_password_hash: String = row.get(2)?;

    Ok(BankUser {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        pin_hash: PasswordHash::new_unchecked(&raw_password_hash),
        age: row.get::<_, Option<u32>>(3)?.unwrap_or_default(),
        account_number: row.get(4)?,
        branch: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

/// Get the customer with the ID `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no customer has the ID `user_id`.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<BankUser, Error> {
    connection
        .prepare(
            "SELECT id, name, pin_hash, age, account_number, branch
            FROM bank_user WHERE id = :id",
        )?
        .query_row(&[(":id", &user_id.as_i64())], map_row_to_user)
        .map_err(|error| error.into())
}

/// Get the customer that owns `account_number`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no customer owns `account_number`.
pub fn get_user_by_account_number(
    account_number: &str,
    connection: &Connection,
) -> Result<BankUser, Error> {
    connection
        .prepare(
            "SELECT id, name, pin_hash, age, account_number, branch
            FROM bank_user WHERE account_number = :account_number",
        )?
        .query_row(&[(":account_number", account_number)], map_row_to_user)
        .map_err(|error| error.into())
}

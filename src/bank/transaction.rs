//! The deposit and withdrawal records of the bank ledger.
//!
//! Records are append-only: once inserted they are never updated or deleted.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use time::OffsetDateTime;

use crate::{DatabaseId, Error, UserID};

/// Whether a transaction adds money to or takes money from an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Money paid into the account.
    Deposit,
    /// Money taken out of the account.
    Withdrawal,
}

impl TransactionKind {
    fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }

    /// The label used when the customer does not provide one.
    pub fn default_label(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdraw",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdrawal" => Ok(TransactionKind::Withdrawal),
            other => Err(FromSqlError::Other(
                format!("unknown transaction kind {other:?}").into(),
            )),
        }
    }
}

/// A single deposit or withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The transaction's ID in the application database.
    pub id: DatabaseId,
    /// The customer that owns the account.
    pub user_id: UserID,
    /// Whether money was paid in or taken out.
    pub kind: TransactionKind,
    /// The amount of money moved, always stored as entered.
    pub amount: f64,
    /// A short description shown on the dashboard.
    pub label: String,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS bank_transaction (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES bank_user(id),
                kind TEXT NOT NULL CHECK(kind IN ('deposit','withdrawal')),
                amount REAL NOT NULL,
                label TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_bank_transaction_user_id ON bank_transaction(user_id)",
        (),
    )?;

    Ok(())
}

/// Append a transaction to the ledger of `user_id`, timestamped with the current UTC time.
///
/// No balance check is made: a withdrawal may take the account below zero.
///
/// # Errors
///
/// Returns [Error::InvalidForeignKey] if `user_id` does not refer to a
/// customer, or [Error::SqlError] if some other SQL error occurred.
pub fn create_transaction(
    user_id: UserID,
    kind: TransactionKind,
    amount: f64,
    label: &str,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO bank_transaction (user_id, kind, amount, label, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (user_id.as_i64(), kind, amount, label, created_at),
    )?;

    Ok(Transaction {
        id: connection.last_insert_rowid(),
        user_id,
        kind,
        amount,
        label: label.to_owned(),
        created_at,
    })
}

fn map_row_to_transaction(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        kind: row.get(2)?,
        amount: row.get(3)?,
        label: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Get every transaction of `user_id`, newest first.
///
/// Transactions recorded at the same instant are ordered by descending ID.
pub fn get_transactions_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, kind, amount, label, created_at
            FROM bank_transaction
            WHERE user_id = :user_id
            ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row_to_transaction)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod transaction_tests {
    use rusqlite::Connection;
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        Error, PasswordHash, UserID,
        bank::user::{NewBankUser, create_user, create_user_table},
    };

    use super::{
        TransactionKind, create_transaction, create_transaction_table, get_transactions_for_user,
    };

    fn get_db_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        connection
            .pragma_update(None, "foreign_keys", "ON")
            .expect("Could not enable foreign keys");
        create_user_table(&connection).expect("Could not create user table");
        create_transaction_table(&connection).expect("Could not create transaction table");

        connection
    }

    fn create_test_user(account_number: &str, connection: &Connection) -> UserID {
        create_user(
            NewBankUser {
                name: "Bob".to_owned(),
                pin_hash: PasswordHash::new_unchecked("hunter2"),
                age: 40,
                account_number: account_number.to_owned(),
                branch: "Uptown".to_owned(),
            },
            connection,
        )
        .expect("Could not create test user")
        .id
    }

    #[test]
    fn create_transaction_succeeds() {
        let connection = get_db_connection();
        let user_id = create_test_user("ACC-1", &connection);

        let transaction =
            create_transaction(user_id, TransactionKind::Deposit, 100.0, "Pay", &connection)
                .unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.user_id, user_id);
        assert_eq!(transaction.kind, TransactionKind::Deposit);
        assert_eq!(transaction.amount, 100.0);
        assert_eq!(transaction.label, "Pay");
    }

    #[test]
    fn create_transaction_fails_for_missing_user() {
        let connection = get_db_connection();

        let result = create_transaction(
            UserID::new(99),
            TransactionKind::Deposit,
            1.0,
            "Deposit",
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidForeignKey));
    }

    #[test]
    fn transactions_are_newest_first_with_ties_broken_by_id() {
        let connection = get_db_connection();
        let user_id = create_test_user("ACC-1", &connection);
        let insert = |kind: &str, amount: f64, created_at: OffsetDateTime| {
            connection
                .execute(
                    "INSERT INTO bank_transaction (user_id, kind, amount, label, created_at)
                    VALUES (?1, ?2, ?3, 'test', ?4)",
                    (user_id.as_i64(), kind, amount, created_at),
                )
                .unwrap();
            connection.last_insert_rowid()
        };
        let oldest = insert("deposit", 100.0, datetime!(2025-01-01 09:00 UTC));
        let tied_first = insert("deposit", 50.0, datetime!(2025-01-02 09:00 UTC));
        let tied_second = insert("withdrawal", 30.0, datetime!(2025-01-02 09:00 UTC));

        let got: Vec<_> = get_transactions_for_user(user_id, &connection)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.id)
            .collect();

        assert_eq!(got, vec![tied_second, tied_first, oldest]);
    }

    #[test]
    fn transactions_only_include_the_given_user() {
        let connection = get_db_connection();
        let alice = create_test_user("ACC-1", &connection);
        let bob = create_test_user("ACC-2", &connection);
        create_transaction(alice, TransactionKind::Deposit, 10.0, "a", &connection).unwrap();
        create_transaction(bob, TransactionKind::Deposit, 20.0, "b", &connection).unwrap();

        let transactions = get_transactions_for_user(alice, &connection).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].user_id, alice);
    }

    #[test]
    fn unknown_kind_is_rejected_by_the_table() {
        let connection = get_db_connection();
        let user_id = create_test_user("ACC-1", &connection);

        let result = connection.execute(
            "INSERT INTO bank_transaction (user_id, kind, amount, label, created_at)
            VALUES (?1, 'transfer', 1.0, 'x', '2025-01-01')",
            (user_id.as_i64(),),
        );

        assert!(result.is_err());
    }
}

//! Selects which management system to serve.

use axum::Router;
use rusqlite::Connection;

use crate::{AppState, Error, bank, hospital, inventory, library, payroll};

/// The management systems that can be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum App {
    /// Customer accounts with a deposit/withdrawal ledger.
    Bank,
    /// Employees and their salaries.
    Payroll,
    /// Doctors and appointment booking.
    Hospital,
    /// Static product catalogue pages.
    Inventory,
    /// Books, members and borrow/return records.
    Library,
}

impl App {
    /// Create the tables used by the app if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    pub fn initialize_db(&self, connection: &Connection) -> Result<(), Error> {
        // SQLite only enforces REFERENCES clauses when asked to, once per connection.
        connection.pragma_update(None, "foreign_keys", "ON")?;

        match self {
            App::Bank => bank::initialize(connection),
            App::Payroll => payroll::initialize(connection),
            App::Hospital => hospital::initialize(connection),
            App::Inventory => Ok(()),
            App::Library => library::initialize(connection),
        }
    }

    /// Return a router with all the app's routes.
    pub fn build_router(&self, state: AppState) -> Router {
        match self {
            App::Bank => bank::build_router(state),
            App::Payroll => payroll::build_router(state),
            App::Hospital => hospital::build_router(state),
            App::Inventory => inventory::build_router(state),
            App::Library => library::build_router(state),
        }
    }

    /// Whether the app has users that log in, and therefore needs a cookie secret.
    pub fn has_log_in(&self) -> bool {
        matches!(self, App::Bank | App::Payroll | App::Hospital)
    }

    /// The database file used when none is given on the command line.
    ///
    /// Inventory stores nothing, so it has no default file.
    pub fn default_db_path(&self) -> Option<&'static str> {
        match self {
            App::Bank => Some("bank.db"),
            App::Payroll => Some("payroll.db"),
            App::Hospital => Some("hospital.db"),
            App::Inventory => None,
            App::Library => Some("library.db"),
        }
    }

    /// Open the database at `db_path`, falling back to the app's default file.
    ///
    /// Apps without a default file get an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the database file cannot be opened.
    pub fn open_db(&self, db_path: Option<&str>) -> Result<Connection, Error> {
        let connection = match db_path.or(self.default_db_path()) {
            Some(db_path) => Connection::open(db_path)?,
            None => Connection::open_in_memory()?,
        };

        Ok(connection)
    }
}

#[cfg(test)]
mod app_tests {
    use rusqlite::Connection;

    use crate::App;

    #[test]
    fn initialize_db_is_idempotent() {
        for app in [
            App::Bank,
            App::Payroll,
            App::Hospital,
            App::Inventory,
            App::Library,
        ] {
            let connection = Connection::open_in_memory().unwrap();

            assert_eq!(Ok(()), app.initialize_db(&connection), "{app:?}");
            assert_eq!(Ok(()), app.initialize_db(&connection), "{app:?}");
        }
    }

    #[test]
    fn inventory_does_not_create_a_database_file() {
        assert_eq!(App::Inventory.default_db_path(), None);

        let connection = App::Inventory.open_db(None).unwrap();

        assert!(connection.path().is_none_or(str::is_empty));
    }

    #[test]
    fn apps_with_tables_default_to_their_own_file() {
        assert_eq!(App::Bank.default_db_path(), Some("bank.db"));
        assert_eq!(App::Payroll.default_db_path(), Some("payroll.db"));
        assert_eq!(App::Hospital.default_db_path(), Some("hospital.db"));
        assert_eq!(App::Library.default_db_path(), Some("library.db"));
    }

    #[test]
    fn only_apps_with_users_need_a_secret() {
        assert!(App::Bank.has_log_in());
        assert!(App::Payroll.has_log_in());
        assert!(App::Hospital.has_log_in());
        assert!(!App::Inventory.has_log_in());
        assert!(!App::Library.has_log_in());
    }
}

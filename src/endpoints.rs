//! The endpoint URIs for each app.
//!
//! For endpoints that take a parameter, e.g., '/api/books/{book_id}', use [format_endpoint].

/// Endpoints of the banking app.
pub mod bank {
    /// The sign-up page, which is also the landing page.
    pub const ROOT: &str = "/";
    /// The route for creating a new account holder.
    pub const REGISTER: &str = "/register";
    /// The sign-in page.
    pub const SIGN_IN_VIEW: &str = "/signin";
    /// The route for logging in an account holder.
    pub const LOG_IN: &str = "/login";
    /// The account holder's details, balance and transactions.
    pub const DASHBOARD_VIEW: &str = "/dashboard";
    /// The route for depositing money.
    pub const DEPOSIT: &str = "/txn/deposit";
    /// The route for withdrawing money.
    pub const WITHDRAW: &str = "/txn/withdraw";
    /// The route for the client to log out the current account holder.
    pub const LOG_OUT: &str = "/logout";
}

/// Endpoints of the payroll app.
pub mod payroll {
    /// The log-in page, which is also the landing page.
    pub const ROOT: &str = "/";
    /// The registration page and the route for creating a new user.
    pub const REGISTER: &str = "/register";
    /// The route for logging in a user.
    pub const LOG_IN: &str = "/login";
    /// The list of employees and the total salary.
    pub const DASHBOARD_VIEW: &str = "/dashboard";
    /// The route for adding an employee.
    pub const ADD_EMPLOYEE: &str = "/add_employee";
    /// The route for the client to log out the current user.
    pub const LOG_OUT: &str = "/logout";
}

/// Endpoints of the hospital app.
pub mod hospital {
    /// The root route which redirects to the log-in page.
    pub const ROOT: &str = "/";
    /// The registration page and the route for creating a new user.
    pub const REGISTER: &str = "/register";
    /// The log-in page and the route for logging in a user.
    pub const LOG_IN: &str = "/login";
    /// The doctors, appointments and users overview.
    pub const DASHBOARD_VIEW: &str = "/dashboard";
    /// The route for booking an appointment.
    pub const BOOK_APPOINTMENT: &str = "/book_appointment";
    /// The route for the client to log out the current user.
    pub const LOG_OUT: &str = "/logout";
}

/// Endpoints of the inventory app.
pub mod inventory {
    /// The home page.
    pub const ROOT: &str = "/";
    /// The products page.
    pub const PRODUCTS_VIEW: &str = "/products";
    /// The categories page.
    pub const CATEGORIES_VIEW: &str = "/categories";
    /// The about page.
    pub const ABOUT_VIEW: &str = "/about";
}

/// Endpoints of the library app.
pub mod library {
    /// The catalogue page.
    pub const ROOT: &str = "/";
    /// The route to list and create books.
    pub const BOOKS: &str = "/api/books";
    /// The route to delete a book.
    pub const BOOK: &str = "/api/books/{book_id}";
    /// The route to list and create members.
    pub const MEMBERS: &str = "/api/members";
    /// The route to delete a member.
    pub const MEMBER: &str = "/api/members/{member_id}";
    /// The route to list and create borrow/return records.
    pub const TRANSACTIONS: &str = "/api/transactions";
}

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/books/{book_id}', '{book_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for uri in [
            endpoints::bank::ROOT,
            endpoints::bank::REGISTER,
            endpoints::bank::SIGN_IN_VIEW,
            endpoints::bank::LOG_IN,
            endpoints::bank::DASHBOARD_VIEW,
            endpoints::bank::DEPOSIT,
            endpoints::bank::WITHDRAW,
            endpoints::bank::LOG_OUT,
            endpoints::payroll::REGISTER,
            endpoints::payroll::LOG_IN,
            endpoints::payroll::DASHBOARD_VIEW,
            endpoints::payroll::ADD_EMPLOYEE,
            endpoints::payroll::LOG_OUT,
            endpoints::hospital::REGISTER,
            endpoints::hospital::LOG_IN,
            endpoints::hospital::DASHBOARD_VIEW,
            endpoints::hospital::BOOK_APPOINTMENT,
            endpoints::hospital::LOG_OUT,
            endpoints::inventory::PRODUCTS_VIEW,
            endpoints::inventory::CATEGORIES_VIEW,
            endpoints::inventory::ABOUT_VIEW,
            endpoints::library::BOOKS,
            endpoints::library::BOOK,
            endpoints::library::MEMBERS,
            endpoints::library::MEMBER,
            endpoints::library::TRANSACTIONS,
        ] {
            assert_endpoint_is_valid_uri(uri);
        }
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
    }
}

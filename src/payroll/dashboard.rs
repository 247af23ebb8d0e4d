//! The payroll dashboard and the endpoint for adding employees.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    AppState, Error, UserID,
    auth::log_out_response,
    endpoints::payroll as endpoints,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, nav_bar, submit_button, text_input,
    },
    payroll::{
        Employee,
        employee::{EmployeeForm, create_employee, get_employees, total_salary},
        user::get_user_by_id,
    },
};

fn add_employee_form() -> Markup {
    html! {
        form action=(endpoints::ADD_EMPLOYEE) method="post" class="card"
        {
            h2 { "Add Employee" }

            (text_input("Name", "name", "text", ""))
            (text_input("Position", "position", "text", ""))
            (text_input("Salary", "salary", "number", ""))
            (text_input("Joining Date", "joining_date", "date", ""))
            (submit_button("Add Employee"))
        }
    }
}

fn employees_table(employees: &[Employee]) -> Markup {
    html! {
        table
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th class=(TABLE_CELL_STYLE) { "ID" }
                    th class=(TABLE_CELL_STYLE) { "Name" }
                    th class=(TABLE_CELL_STYLE) { "Position" }
                    th class=(TABLE_CELL_STYLE) { "Salary" }
                    th class=(TABLE_CELL_STYLE) { "Joining Date" }
                }
            }

            tbody
            {
                @for employee in employees
                {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (employee.id) }
                        td class=(TABLE_CELL_STYLE) { (employee.name) }
                        td class=(TABLE_CELL_STYLE) { (employee.position) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(employee.salary)) }
                        td class=(TABLE_CELL_STYLE) { (employee.joining_date) }
                    }
                }
            }
        }
    }
}

fn dashboard_view(username: &str, employees: &[Employee]) -> Markup {
    let content = html! {
        (nav_bar(&[(endpoints::DASHBOARD_VIEW, "Dashboard"), (endpoints::LOG_OUT, "Log out")]))

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="card"
            {
                h1 { "Welcome, " (username) }

                p
                {
                    (employees.len()) " employees, total salary "
                    strong id="total-salary" { (format_currency(total_salary(employees))) }
                }
            }

            (add_employee_form())

            section class="card"
            {
                h2 { "Employees" }
                (employees_table(employees))
            }
        }
    };

    base("Dashboard", "Payroll", &content)
}

/// Display every employee and the total salary.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let user = match get_user_by_id(user_id, &connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            tracing::warn!("Session refers to unknown user {user_id}, logging out.");
            return log_out_response(jar, endpoints::ROOT);
        }
        Err(error) => return error.into_response(),
    };

    let employees = match get_employees(&connection) {
        Ok(employees) => employees,
        Err(error) => {
            tracing::error!("Could not get employees: {error}");
            return error.into_response();
        }
    };
    drop(connection);

    dashboard_view(&user.username, &employees).into_response()
}

/// A route handler for adding an employee, redirects to the dashboard.
pub async fn add_employee_endpoint(
    State(state): State<AppState>,
    Form(form): Form<EmployeeForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_employee(&form, &connection) {
        Ok(employee) => {
            tracing::debug!("Added employee {}", employee.id);
            Redirect::to(endpoints::DASHBOARD_VIEW).into_response()
        }
        Err(error) => {
            tracing::error!("Could not add employee {form:?}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod dashboard_tests {
    use axum_test::TestServer;

    use crate::{
        App,
        endpoints::payroll as endpoints,
        test_utils::{assert_redirect, assert_valid_html, get_test_server, parse_html, select_text},
    };

    async fn get_logged_in_server() -> TestServer {
        let mut server = get_test_server(App::Payroll);
        server.save_cookies();
        server
            .post(endpoints::REGISTER)
            .form(&[("username", "clerk"), ("password", "hunter2")])
            .await
            .assert_status_see_other();
        server
            .post(endpoints::LOG_IN)
            .form(&[("username", "clerk"), ("password", "hunter2")])
            .await
            .assert_status_see_other();

        server
    }

    #[tokio::test]
    async fn dashboard_requires_a_session() {
        let server = get_test_server(App::Payroll);

        assert_redirect(&server.get(endpoints::DASHBOARD_VIEW).await, endpoints::ROOT);
    }

    #[tokio::test]
    async fn add_employee_requires_a_session() {
        let server = get_test_server(App::Payroll);

        let response = server
            .post(endpoints::ADD_EMPLOYEE)
            .form(&[
                ("name", "Ann"),
                ("position", "Engineer"),
                ("salary", "50000"),
                ("joining_date", "2024-03-01"),
            ])
            .await;

        assert_redirect(&response, endpoints::ROOT);
    }

    #[tokio::test]
    async fn dashboard_lists_employees_and_total_salary() {
        let server = get_logged_in_server().await;

        for (name, salary) in [("Ann", "400"), ("Ben", "62.5")] {
            let response = server
                .post(endpoints::ADD_EMPLOYEE)
                .form(&[
                    ("name", name),
                    ("position", "Engineer"),
                    ("salary", salary),
                    ("joining_date", "2024-03-01"),
                ])
                .await;
            assert_redirect(&response, endpoints::DASHBOARD_VIEW);
        }

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        let document = parse_html(&response.text());
        assert_valid_html(&document);
        assert_eq!(select_text(&document, "h1"), vec!["Welcome, clerk"]);
        assert_eq!(
            select_text(&document, "tbody tr td:nth-child(2)"),
            vec!["Ann", "Ben"]
        );
        assert_eq!(
            select_text(&document, "tbody tr td:nth-child(5)"),
            vec!["2024-03-01", "2024-03-01"]
        );
        assert_eq!(select_text(&document, "#total-salary"), vec!["$462.50"]);
    }
}

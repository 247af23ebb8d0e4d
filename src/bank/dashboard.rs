//! The customer's dashboard: account details, balance and transaction history.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error, UserID,
    auth::log_out_response,
    bank::{
        BankUser, Transaction, balance,
        transaction::get_transactions_for_user,
        user::get_user_by_id,
    },
    endpoints::bank as endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, nav_bar, submit_button,
    },
};

const CREATED_AT_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

fn transaction_form(action: &str, id_prefix: &str, title: &str) -> Markup {
    html! {
        form action=(action) method="post" class="card"
        {
            h2 { (title) }

            label for={ (id_prefix) "-amount" } class=(FORM_LABEL_STYLE) { "Amount" }
            input
                type="number"
                name="amount"
                id={ (id_prefix) "-amount" }
                step="0.01"
                min="0.01"
                class=(FORM_TEXT_INPUT_STYLE)
                required;

            label for={ (id_prefix) "-label" } class=(FORM_LABEL_STYLE) { "Label" }
            input
                type="text"
                name="label"
                id={ (id_prefix) "-label" }
                placeholder="Optional"
                class=(FORM_TEXT_INPUT_STYLE);

            (submit_button(title))
        }
    }
}

fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        table
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th class=(TABLE_CELL_STYLE) { "Date" }
                    th class=(TABLE_CELL_STYLE) { "Type" }
                    th class=(TABLE_CELL_STYLE) { "Label" }
                    th class=(TABLE_CELL_STYLE) { "Amount" }
                }
            }

            tbody
            {
                @for transaction in transactions
                {
                    tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                    {
                        td class=(TABLE_CELL_STYLE)
                        {
                            (transaction.created_at.format(CREATED_AT_FORMAT).unwrap_or_default())
                        }
                        td class=(TABLE_CELL_STYLE) { (transaction.kind) }
                        td class=(TABLE_CELL_STYLE) { (transaction.label) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                    }
                }

                @if transactions.is_empty()
                {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td colspan="4" class=(TABLE_CELL_STYLE) { "No transactions yet." }
                    }
                }
            }
        }
    }
}

fn dashboard_view(user: &BankUser, transactions: &[Transaction]) -> Markup {
    let content = html! {
        (nav_bar(&[(endpoints::DASHBOARD_VIEW, "Dashboard"), (endpoints::LOG_OUT, "Log out")]))

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="card"
            {
                h1 { "Welcome, " (user.name) }

                dl
                {
                    dt { "Account Number" }
                    dd { (user.account_number) }
                    dt { "Branch" }
                    dd { (user.branch) }
                    dt { "Age" }
                    dd { (user.age) }
                }

                p { "Balance: " strong id="balance" { (format_currency(balance(transactions))) } }
            }

            (transaction_form(endpoints::DEPOSIT, "deposit", "Deposit"))
            (transaction_form(endpoints::WITHDRAW, "withdraw", "Withdraw"))

            section class="card"
            {
                h2 { "Transactions" }
                (transactions_table(transactions))
            }
        }
    };

    base("Dashboard", "Bank", &content)
}

/// Display the dashboard of the signed in customer.
///
/// A session for a customer that no longer exists is ended.
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
            return log_out_response(jar, endpoints::SIGN_IN_VIEW);
        }
        Err(error) => return error.into_response(),
    };

    let transactions = match get_transactions_for_user(user_id, &connection) {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::error!("Could not get transactions for user {user_id}: {error}");
            return error.into_response();
        }
    };
    drop(connection);

    dashboard_view(&user, &transactions).into_response()
}

#[cfg(test)]
mod dashboard_tests {
    use axum_test::TestServer;

    use crate::{
        App,
        endpoints::bank as endpoints,
        test_utils::{assert_redirect, assert_valid_html, get_test_server, parse_html, select_text},
    };

    async fn register_and_log_in(server: &TestServer, name: &str, account_number: &str) {
        server
            .post(endpoints::REGISTER)
            .form(&[
                ("name", name),
                ("pin", "1234"),
                ("cpin", "1234"),
                ("age", "30"),
                ("account_number", account_number),
                ("branch", "Central"),
            ])
            .await
            .assert_status_see_other();

        server
            .post(endpoints::LOG_IN)
            .form(&[("account_number", account_number), ("pin", "1234")])
            .await
            .assert_status_see_other();
    }

    #[tokio::test]
    async fn dashboard_requires_a_session() {
        let server = get_test_server(App::Bank);

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        assert_redirect(&response, endpoints::SIGN_IN_VIEW);
    }

    #[tokio::test]
    async fn dashboard_shows_zero_balance_for_new_account() {
        let mut server = get_test_server(App::Bank);
        server.save_cookies();
        register_and_log_in(&server, "Alice", "ACC-1").await;

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        let document = parse_html(&response.text());
        assert_valid_html(&document);
        assert_eq!(select_text(&document, "#balance"), vec!["$0.00"]);
        assert_eq!(select_text(&document, "h1"), vec!["Welcome, Alice"]);
    }

    #[tokio::test]
    async fn dashboard_shows_balance_and_newest_transaction_first() {
        let mut server = get_test_server(App::Bank);
        server.save_cookies();
        register_and_log_in(&server, "Alice", "ACC-1").await;

        for (endpoint, amount, label) in [
            (endpoints::DEPOSIT, "100", "Salary"),
            (endpoints::DEPOSIT, "50", "Gift"),
            (endpoints::WITHDRAW, "30", "Groceries"),
        ] {
            let response = server
                .post(endpoint)
                .form(&[("amount", amount), ("label", label)])
                .await;
            assert_redirect(&response, endpoints::DASHBOARD_VIEW);
        }

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        let document = parse_html(&response.text());
        assert_eq!(select_text(&document, "#balance"), vec!["$120.00"]);
        let labels = select_text(&document, "tbody tr td:nth-child(3)");
        assert_eq!(labels, vec!["Groceries", "Gift", "Salary"]);
    }

    #[tokio::test]
    async fn dashboard_only_shows_the_session_users_transactions() {
        let mut server = get_test_server(App::Bank);
        server.save_cookies();
        register_and_log_in(&server, "Alice", "ACC-1").await;
        server
            .post(endpoints::DEPOSIT)
            .form(&[("amount", "75"), ("label", "Alice's pay")])
            .await
            .assert_status_see_other();

        register_and_log_in(&server, "Bob", "ACC-2").await;
        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        let document = parse_html(&response.text());
        assert_eq!(select_text(&document, "h1"), vec!["Welcome, Bob"]);
        assert_eq!(select_text(&document, "#balance"), vec!["$0.00"]);
        assert!(!response.text().contains("Alice&#39;s pay"));
        assert!(!response.text().contains("Alice's pay"));
    }

    #[tokio::test]
    async fn withdrawal_can_overdraw() {
        let mut server = get_test_server(App::Bank);
        server.save_cookies();
        register_and_log_in(&server, "Alice", "ACC-1").await;

        server
            .post(endpoints::WITHDRAW)
            .form(&[("amount", "30.5"), ("label", "")])
            .await
            .assert_status_see_other();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        let document = parse_html(&response.text());
        assert_eq!(select_text(&document, "#balance"), vec!["-$30.50"]);
        let labels = select_text(&document, "tbody tr td:nth-child(3)");
        assert_eq!(labels, vec!["Withdraw"]);
    }
}

//! The catalogue page listing every book and whether it is on the shelf.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    endpoints::library as endpoints,
    html::{PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base},
    library::{
        LibraryState,
        book::{Book, get_books},
        member::get_members,
    },
};

fn catalog_view(books: &[Book], member_count: usize) -> Markup {
    let available_count = books.iter().filter(|book| book.available).count();

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="card"
            {
                h1 { "Library Catalogue" }

                p
                {
                    (books.len()) " books, " (available_count) " available, "
                    (member_count) " members."
                }

                p
                {
                    "The catalogue is also available as JSON at "
                    code { (endpoints::BOOKS) } ", "
                    code { (endpoints::MEMBERS) } " and "
                    code { (endpoints::TRANSACTIONS) } "."
                }
            }

            section class="card"
            {
                table
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th class=(TABLE_CELL_STYLE) { "Title" }
                            th class=(TABLE_CELL_STYLE) { "Author" }
                            th class=(TABLE_CELL_STYLE) { "Category" }
                            th class=(TABLE_CELL_STYLE) { "Year" }
                            th class=(TABLE_CELL_STYLE) { "Status" }
                        }
                    }

                    tbody
                    {
                        @for book in books
                        {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (book.title) }
                                td class=(TABLE_CELL_STYLE) { (book.author.as_deref().unwrap_or_default()) }
                                td class=(TABLE_CELL_STYLE) { (book.category.as_deref().unwrap_or_default()) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @if let Some(year) = book.year { (year) }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @if book.available { "Available" } @else { "Borrowed" }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Catalogue", "Library", &content)
}

/// Display the catalogue.
pub async fn get_catalog_page(State(state): State<LibraryState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let catalog = get_books(&connection)
        .and_then(|books| Ok((books, get_members(&connection)?.len())));

    match catalog {
        Ok((books, member_count)) => catalog_view(&books, member_count).into_response(),
        Err(error) => {
            tracing::error!("Could not load the catalogue: {error}");
            error.into_response()
        }
    }
}

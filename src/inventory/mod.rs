//! An inventory placeholder: a handful of static pages and no stored data.

use axum::{Router, routing::get};
use maud::{Markup, html};

use crate::{
    AppState,
    endpoints::inventory as endpoints,
    html::{PAGE_CONTAINER_STYLE, base, nav_bar},
    not_found::get_404_not_found,
};

const NAV_LINKS: [(&str, &str); 4] = [
    (endpoints::ROOT, "Home"),
    (endpoints::PRODUCTS_VIEW, "Products"),
    (endpoints::CATEGORIES_VIEW, "Categories"),
    (endpoints::ABOUT_VIEW, "About"),
];

fn page(title: &str, content: Markup) -> Markup {
    let content = html! {
        (nav_bar(&NAV_LINKS))

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="card"
            {
                h1 { (title) }
                (content)
            }
        }
    };

    base(title, "Inventory", &content)
}

async fn get_home_page() -> Markup {
    page(
        "Inventory Management",
        html! {
            p { "Keep track of what is in stock and where it belongs." }
        },
    )
}

async fn get_products_page() -> Markup {
    page(
        "Products",
        html! {
            p { "No products have been added yet." }
        },
    )
}

async fn get_categories_page() -> Markup {
    page(
        "Categories",
        html! {
            p { "No categories have been added yet." }
        },
    )
}

async fn get_about_page() -> Markup {
    page(
        "About",
        html! {
            p { "A small inventory management site." }
        },
    )
}

/// Return a router with the static inventory pages.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(endpoints::PRODUCTS_VIEW, get(get_products_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::ABOUT_VIEW, get(get_about_page))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod inventory_tests {
    use axum::http::StatusCode;

    use crate::{
        App,
        endpoints::inventory as endpoints,
        test_utils::{assert_valid_html, get_test_server, parse_html, select_text},
    };

    #[tokio::test]
    async fn every_page_renders_with_navigation() {
        let server = get_test_server(App::Inventory);

        for (endpoint, want_title) in [
            (endpoints::ROOT, "Inventory Management"),
            (endpoints::PRODUCTS_VIEW, "Products"),
            (endpoints::CATEGORIES_VIEW, "Categories"),
            (endpoints::ABOUT_VIEW, "About"),
        ] {
            let response = server.get(endpoint).await;

            response.assert_status_ok();
            let document = parse_html(&response.text());
            assert_valid_html(&document);
            assert_eq!(select_text(&document, "h1"), vec![want_title]);
            assert_eq!(select_text(&document, "nav a").len(), 4);
        }
    }

    #[tokio::test]
    async fn unknown_page_is_not_found() {
        let server = get_test_server(App::Inventory);

        server
            .get("/suppliers")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

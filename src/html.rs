//! Shared maud building blocks: the page shell, form inputs and number formatting.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

// Link styles
pub const LINK_STYLE: &str = "link";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "button button-primary";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "card form-card";
pub const FORM_LABEL_STYLE: &str = "form-label";
pub const FORM_TEXT_INPUT_STYLE: &str = "form-input";
pub const FORM_ERROR_STYLE: &str = "form-error";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "table-header";
pub const TABLE_ROW_STYLE: &str = "table-row";
pub const TABLE_CELL_STYLE: &str = "table-cell";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "page";

const BASE_STYLES: &str = r#"
    body { font-family: system-ui, sans-serif; margin: 0; background: #f9fafb; color: #111827; }
    nav { display: flex; gap: 1rem; padding: 1rem 1.5rem; background: #1d4ed8; }
    nav a { color: white; text-decoration: none; font-weight: 600; }
    .page { max-width: 64rem; margin: 0 auto; padding: 2rem 1.5rem; }
    .card { background: white; border-radius: 0.5rem; box-shadow: 0 1px 3px rgb(0 0 0 / 0.1); padding: 1.5rem; margin-bottom: 1.5rem; }
    .form-card { max-width: 28rem; margin: 2rem auto; }
    .form-label { display: block; margin-bottom: 0.25rem; font-size: 0.875rem; font-weight: 500; }
    .form-input { display: block; width: 100%; box-sizing: border-box; padding: 0.5rem; margin-bottom: 1rem; border: 1px solid #d1d5db; border-radius: 0.25rem; }
    .form-error { color: #ef4444; }
    .button { padding: 0.5rem 1rem; border: none; border-radius: 0.25rem; cursor: pointer; }
    .button-primary { width: 100%; background: #3b82f6; color: white; }
    .link { color: #2563eb; text-decoration: underline; }
    .table-header { text-align: left; font-size: 0.75rem; text-transform: uppercase; background: #f3f4f6; }
    .table-row { border-bottom: 1px solid #e5e7eb; }
    .table-cell { padding: 0.75rem 1rem; }
    table { width: 100%; border-collapse: collapse; }
"#;

/// The HTML document shell shared by every page.
///
/// `app_name` is appended to the page title, e.g. "Dashboard - Bank".
pub fn base(title: &str, app_name: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - " (app_name) }
                style { (PreEscaped(BASE_STYLES)) }
            }

            body
            {
                (content)
            }
        }
    }
}

/// A navigation bar with a link for each `(url, text)` pair.
pub fn nav_bar(links: &[(&str, &str)]) -> Markup {
    html! {
        nav
        {
            @for (url, text) in links
            {
                a href=(url) { (text) }
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class=(PAGE_CONTAINER_STYLE)
        {
            div class="card"
            {
                h1 { (header) }

                p { (description) }

                p { (fix) }

                a href="/" class=(LINK_STYLE) { "Back to Homepage" }
            }
        }
    );

    base(title, "Management Systems", &content)
}

/// A titled card holding a form, used by the log-in and registration pages.
pub fn form_card(form_title: &str, form: &Markup) -> Markup {
    html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 { (form_title) }

            (form)
        }
    }
}

/// A labelled text input.
///
/// `input_type` is the HTML input type, e.g. "text", "number" or "date".
pub fn text_input(label: &str, name: &str, input_type: &str, value: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type=(input_type)
                name=(name)
                id=(name)
                value=(value)
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }
    }
}

/// A labelled password input with an optional error message below it.
pub fn password_input(label: &str, name: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type="password"
                name=(name)
                id=(name)
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus[error_message.is_some()];

            @if let Some(error_message) = error_message
            {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

/// An error message shown at the top of a form.
pub fn form_error(error_message: Option<&str>) -> Markup {
    html! {
        @if let Some(error_message) = error_message
        {
            p class=(FORM_ERROR_STYLE) role="alert" { (error_message) }
        }
    }
}

pub fn submit_button(text: &str) -> Markup {
    html! {
        button type="submit" class=(BUTTON_PRIMARY_STYLE) { (text) }
    }
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}

pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });
    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let formatted = match (positive_fmt, negative_fmt) {
        (Some(_), Some(negative_fmt)) if number < 0.0 => negative_fmt.fmt_string(number.abs()),
        (Some(positive_fmt), Some(_)) if number > 0.0 => positive_fmt.fmt_string(number),
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        (Some(_), Some(_)) => "$0.00".to_owned(),
        _ => return format!("${number:.2}"),
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    match formatted.rfind('.') {
        Some(dot) if formatted.len() - dot == 2 => format!("{formatted}0"),
        Some(_) => formatted,
        None => format!("{formatted}.00"),
    }
}

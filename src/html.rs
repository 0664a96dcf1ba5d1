//! Shared styles, the page skeleton and formatting helpers for the HTML views.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, html};
use numfmt::{Formatter, Precision};

use crate::alert::Alert;

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_CHECKBOX_STYLE: &str = "h-4 w-4 rounded border-gray-300 \
    text-blue-600 dark:border-gray-600";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

pub const TABLE_EMPTY_STYLE: &str = "px-6 py-4 text-center text-gray-500 dark:text-gray-400";

pub const PAGINATION_STYLE: &str = "flex justify-center py-4 text-sm";

// Category card styles
pub const CARD_STYLE: &str = "block rounded border border-gray-200 bg-white px-4 py-3 \
    shadow-sm hover:bg-gray-100 dark:border-gray-700 dark:bg-gray-800 dark:hover:bg-gray-700";

pub const CARD_SELECTED_STYLE: &str = "block rounded border border-blue-600 bg-blue-50 px-4 py-3 \
    shadow-sm dark:border-blue-500 dark:bg-blue-600/20";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// The HTML skeleton shared by every page.
///
/// `alert` is rendered into the alert container, e.g. the success message
/// left behind by the form that redirected here.
pub fn base(title: &str, content: &Markup, alert: Option<Alert>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Badget Console" }

                script src="https://cdn.tailwindcss.com" {}
                script src="https://unpkg.com/htmx.org@2.0.8" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4" {}
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {
                    @if let Some(alert) = alert {
                        (alert.into_html())
                    }
                }
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &content, None)
}

/// A labelled text input for the record forms.
pub fn text_input(label: &str, name: &str, value: &str, input_type: &str, required: bool) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                id=(name)
                type=(input_type)
                name=(name)
                value=(value)
                step=[(input_type == "number").then_some("0.01")]
                required[required]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// The search box above a table, refreshing `target` as the user types.
pub fn search_input(route: &str, target: &str, placeholder: &str, value: &str) -> Markup {
    html! {
        input
            type="search"
            name="search"
            value=(value)
            placeholder=(placeholder)
            hx-get=(route)
            hx-trigger="input changed, search"
            hx-target=(target)
            hx-swap="outerHTML"
            hx-include="[name='per_page']"
            class=(FORM_TEXT_INPUT_STYLE);
    }
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}

/// Format `number` with thousands separators and two decimal places, e.g. "-1,234.50".
pub fn format_amount(number: f64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let formatter = FMT.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap_or_else(|_| Formatter::new())
            .precision(Precision::Decimals(2))
    });

    if number == 0.0 || !number.is_finite() {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "0.00".to_owned();
    }

    let formatted = if number < 0.0 {
        format!("-{}", formatter.fmt_string(number.abs()))
    } else {
        formatter.fmt_string(number)
    };

    // numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3".
    match formatted.split_once('.') {
        Some((whole, fraction)) if fraction.len() < 2 => format!("{whole}.{fraction:0<2}"),
        Some(_) => formatted,
        None => format!("{formatted}.00"),
    }
}

#[cfg(test)]
mod format_amount_tests {
    use crate::html::format_amount;

    #[test]
    fn formats_with_separators_and_two_decimals() {
        assert_eq!(format_amount(1234.5), "1,234.50");
        assert_eq!(format_amount(1_000_000.0), "1,000,000.00");
        assert_eq!(format_amount(12.34), "12.34");
    }

    #[test]
    fn formats_negative_numbers() {
        assert_eq!(format_amount(-1234.5), "-1,234.50");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_amount(0.0), "0.00");
    }
}

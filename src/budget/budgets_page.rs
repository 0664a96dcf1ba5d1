//! The page listing every badget.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use tokio::sync::Mutex;

use crate::{
    AppState,
    alert::{Alert, PendingAlert},
    budget::Budget,
    data_client::Backend,
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_EMPTY_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_amount, search_input,
    },
    list_view::{ListQuery, ListSnapshot, ListView},
    navigation::NavBar,
    pagination::{
        PaginationConfig, PaginationTarget, create_pagination_indicators, page_size_select,
        pagination_nav,
    },
};

const TABLE_ID: &str = "budget-table";
const TABLE_TARGET: &str = "#budget-table";

/// The state needed for the budgets page.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    pub data_client: Backend,
    pub budgets: Arc<Mutex<ListView<Budget>>>,
    pub pagination_config: PaginationConfig,
    pub pending_alert: PendingAlert,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            data_client: state.data_client.clone(),
            budgets: state.budgets.clone(),
            pagination_config: state.pagination_config.clone(),
            pending_alert: state.pending_alert.clone(),
        }
    }
}

/// Render the budgets page.
///
/// A full page load fetches every badget. Requests from htmx (searching and
/// paging) only filter the badgets already fetched and return the table, unless
/// nothing has been fetched yet.
pub async fn get_budgets_page(
    State(state): State<BudgetsPageState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut budgets = state.budgets.lock().await;

    let mut alert = None;
    if !is_htmx_request || !budgets.is_loaded() {
        if !is_htmx_request {
            alert = state.pending_alert.take().await;
        }

        if let Err(error) = budgets.load(&state.data_client).await {
            tracing::error!("Could not fetch badgets: {error}");

            if is_htmx_request {
                return error.into_alert_response();
            }

            alert = Some(Alert::ErrorSimple {
                message: format!("Error fetching badgets: {error}"),
            });
        }
    }

    query.apply_to(&mut budgets, &state.pagination_config);
    let snapshot = budgets.snapshot();
    drop(budgets);

    let table = budget_table_view(&snapshot, &state.pagination_config);

    if is_htmx_request {
        table.into_response()
    } else {
        budgets_view(&snapshot.search_term, &table, alert).into_response()
    }
}

fn budgets_view(search_term: &str, table: &Markup, alert: Option<Alert>) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Amount Badgets" }

                    a href=(endpoints::NEW_BUDGET_VIEW) class=(LINK_STYLE)
                    {
                        "Add Badget"
                    }
                }

                (search_input(
                    endpoints::BUDGETS_VIEW,
                    TABLE_TARGET,
                    "Search by PWP Code or User...",
                    search_term,
                ))

                (table)
            }
        }
    );

    base("Badgets", &content, alert)
}

fn budget_table_view(snapshot: &ListSnapshot<Budget>, config: &PaginationConfig) -> Markup {
    let target = PaginationTarget {
        route: endpoints::BUDGETS_VIEW,
        target: TABLE_TARGET,
        search: &snapshot.search_term,
        per_page: snapshot.page_size,
    };
    let indicators =
        create_pagination_indicators(snapshot.current_page, snapshot.total_pages, config.max_pages);

    html!(
        div id=(TABLE_ID) class="dark:bg-gray-800 w-full overflow-x-auto"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for heading in [
                            "ID",
                            "PWP Code",
                            "Amount Badget",
                            "Created User",
                            "Created Date",
                            "Remaining Balance",
                            "Approved",
                            "Actions",
                        ] {
                            th scope="col" class=(TABLE_CELL_STYLE) { (heading) }
                        }
                    }
                }

                tbody
                {
                    @for budget in &snapshot.rows {
                        (budget_row_view(budget))
                    }

                    @if snapshot.rows.is_empty() {
                        tr
                        {
                            td colspan="8" class=(TABLE_EMPTY_STYLE) { "No badgets found." }
                        }
                    }
                }
            }

            div class="flex justify-between items-center flex-wrap gap-4 px-6"
            {
                (page_size_select(&config.page_size_options, &target))
                (pagination_nav(&indicators, &target))
            }
        }
    )
}

fn budget_row_view(budget: &Budget) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id);

    html!(
        tr class=(TABLE_ROW_STYLE) data-budget-id=(budget.id)
        {
            td class=(TABLE_CELL_STYLE) { (budget.id) }
            td class=(TABLE_CELL_STYLE) { (budget.code) }
            td class="px-6 py-4 text-right tabular-nums" { (format_amount(budget.amount)) }
            td class=(TABLE_CELL_STYLE) { (budget.creator) }
            td class=(TABLE_CELL_STYLE) { (budget.created_at_display()) }
            td class="px-6 py-4 text-right tabular-nums" { (format_amount(budget.remaining_balance)) }
            td class=(TABLE_CELL_STYLE) { @if budget.approved { "Yes" } @else { "No" } }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(edit_url) class=(LINK_STYLE) { "View / Edit" }
            }
        }
    )
}

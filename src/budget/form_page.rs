//! The pages for creating and viewing/editing a badget.

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    budget::{BudgetDraft, get_budget},
    data_client::Backend,
    database_id::DatabaseId,
    endpoints,
    form::{Draft, RecordForm},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, LINK_STYLE,
        base, text_input,
    },
    navigation::NavBar,
};

/// The state needed for the badget form pages.
#[derive(Debug, Clone)]
pub struct BudgetFormPageState {
    pub data_client: Backend,
}

impl FromRef<AppState> for BudgetFormPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            data_client: state.data_client.clone(),
        }
    }
}

/// Render the page for creating a badget.
pub async fn get_new_budget_page() -> Response {
    let mut form = RecordForm::<BudgetDraft>::default();
    form.begin_edit(None);

    budget_form_view(&form, None).into_response()
}

/// Render the page for viewing and editing the badget `budget_id`.
pub async fn get_edit_budget_page(
    Path(budget_id): Path<DatabaseId>,
    State(state): State<BudgetFormPageState>,
) -> Result<Response, Error> {
    let budget = get_budget(&state.data_client, budget_id)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve badget {budget_id}: {error}"))?;

    let mut form = RecordForm::<BudgetDraft>::default();
    form.begin_edit(Some(&budget));

    Ok(budget_form_view(&form, Some(&budget.created_at_display())).into_response())
}

fn budget_form_view(form: &RecordForm<BudgetDraft>, created_at: Option<&str>) -> Markup {
    let draft = form.draft();
    let (title, active_endpoint, submit_text) = match draft.id() {
        Some(id) => (
            "Edit Badget",
            endpoints::format_endpoint(endpoints::EDIT_BUDGET_VIEW, id),
            "Update Badget",
        ),
        None => (
            "Create Badget",
            endpoints::NEW_BUDGET_VIEW.to_owned(),
            "Create Badget",
        ),
    };
    let nav_bar = NavBar::new(&active_endpoint).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { (title) }

            form
                hx-post=[draft.id().is_none().then_some(endpoints::BUDGETS_API)]
                hx-put=[draft.id().map(|id| endpoints::format_endpoint(endpoints::BUDGET_API, id))]
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                @if let (Some(id), Some(created_at)) = (draft.id(), created_at) {
                    dl class="grid grid-cols-2 gap-2 text-sm"
                    {
                        dt class="font-medium" { "ID" }
                        dd { (id) }
                        dt class="font-medium" { "Created Date" }
                        dd { (created_at) }
                    }
                }

                (text_input("PWP Code", "pwp_code", &draft.code, "text", true))
                (text_input("Amount Badget", "amountbadget", &draft.amount, "number", true))
                (text_input("Created User", "createduser", &draft.creator, "text", true))
                (text_input(
                    "Remaining Balance",
                    "remainingbalance",
                    &draft.remaining_balance,
                    "number",
                    true,
                ))

                div class="flex items-center gap-2"
                {
                    input
                        id="approved"
                        type="checkbox"
                        name="approved"
                        checked[draft.approved]
                        class=(FORM_CHECKBOX_STYLE);

                    label for="approved" class=(FORM_LABEL_STYLE) { "Approved" }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }

                a href=(endpoints::BUDGETS_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base(title, &content, None)
}

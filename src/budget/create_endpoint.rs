//! The endpoint for creating a badget.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use tokio::sync::Mutex;

use crate::{
    AppState,
    alert::PendingAlert,
    budget::{Budget, BudgetDraft},
    data_client::Backend,
    endpoints,
    form::RecordForm,
    list_view::ListView,
};

/// The state needed for creating or updating a badget.
#[derive(Debug, Clone)]
pub struct BudgetEndpointState {
    pub data_client: Backend,
    pub budgets: Arc<Mutex<ListView<Budget>>>,
    pub pending_alert: PendingAlert,
}

impl FromRef<AppState> for BudgetEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            data_client: state.data_client.clone(),
            budgets: state.budgets.clone(),
            pending_alert: state.pending_alert.clone(),
        }
    }
}

/// Save the posted badget form with `form`, then redirect to the budgets page.
///
/// Failures are returned as an alert so the form stays on screen.
pub(super) async fn submit_budget_form(
    state: BudgetEndpointState,
    mut form: RecordForm<BudgetDraft>,
    fields: Vec<(String, String)>,
) -> Response {
    if let Err(error) = form.update_fields(fields) {
        return error.into_alert_response();
    }

    let mut budgets = state.budgets.lock().await;

    match form.submit(&state.data_client, &mut budgets, &()).await {
        Ok(alert) => {
            state.pending_alert.set(alert).await;

            (
                HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not save badget: {error}");
            error.into_alert_response()
        }
    }
}

/// Handle the badget creation form submission.
pub async fn create_budget_endpoint(
    State(state): State<BudgetEndpointState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let mut form = RecordForm::<BudgetDraft>::default();
    form.begin_edit(None);

    submit_budget_form(state, form, fields).await
}

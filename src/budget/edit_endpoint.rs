//! The endpoint for updating a badget.

use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};

use crate::{
    budget::{
        BudgetDraft,
        create_endpoint::{BudgetEndpointState, submit_budget_form},
    },
    database_id::DatabaseId,
    form::RecordForm,
};

/// Handle the badget update form submission.
///
/// The form holds every field of the badget, an unchecked "approved" box is not posted.
pub async fn update_budget_endpoint(
    Path(budget_id): Path<DatabaseId>,
    State(state): State<BudgetEndpointState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let mut form = RecordForm::<BudgetDraft>::default();
    form.begin_update(budget_id);

    submit_budget_form(state, form, fields).await
}

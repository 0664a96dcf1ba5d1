//! Badgets: the budgets page, the create and edit forms, and their endpoints.

mod budgets_page;
mod create_endpoint;
mod domain;
mod edit_endpoint;
mod form_page;

pub use budgets_page::get_budgets_page;
pub use create_endpoint::create_budget_endpoint;
pub use domain::{Budget, BudgetDraft, get_budget};
pub use edit_endpoint::update_budget_endpoint;
pub use form_page::{get_edit_budget_page, get_new_budget_page};

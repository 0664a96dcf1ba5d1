//! The badget record, its form draft and the queries for it.

use serde::{Deserialize, Deserializer, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

use crate::{
    Error, ValidationError,
    data_client::{Collection, DataClient, SelectQuery, decode_rows, encode_record},
    database_id::DatabaseId,
    form::{Draft, FieldInput, Mutation, parse_number},
    list_view::Record,
};

/// A promotional budget ("badget").
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Budget {
    pub id: DatabaseId,
    #[serde(rename = "pwp_code")]
    pub code: String,
    #[serde(rename = "amountbadget")]
    pub amount: f64,
    #[serde(rename = "createduser")]
    pub creator: String,
    #[serde(rename = "createdate", deserialize_with = "deserialize_timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "remainingbalance")]
    pub remaining_balance: f64,
    #[serde(rename = "Approved", default, deserialize_with = "null_as_false")]
    pub approved: bool,
}

impl Budget {
    /// The creation date as shown in tables, e.g. "2025-03-14 09:26".
    pub fn created_at_display(&self) -> String {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]");

        self.created_at
            .format(format)
            .unwrap_or_else(|_| self.created_at.to_string())
    }
}

/// Accept RFC 3339 timestamps, and timestamps without an offset as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;

    OffsetDateTime::parse(&text, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(&format!("{text}Z"), &Rfc3339))
        .map_err(serde::de::Error::custom)
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

impl Record for Budget {
    type Scope = ();

    const COLLECTION: Collection = Collection::Budgets;

    fn id(&self) -> DatabaseId {
        self.id
    }

    fn select_query(_: &()) -> Option<SelectQuery> {
        Some(SelectQuery::all(Collection::Budgets).order_by("createdate", false))
    }

    fn matches(&self, lowercase_term: &str) -> bool {
        self.code.to_lowercase().contains(lowercase_term)
            || self.creator.to_lowercase().contains(lowercase_term)
    }
}

/// Fetch the badget with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such badget.
pub async fn get_budget<C: DataClient>(client: &C, id: DatabaseId) -> Result<Budget, Error> {
    let rows = client
        .select(&SelectQuery::all(Collection::Budgets).eq("id", id))
        .await?;

    decode_rows(rows)?.into_iter().next().ok_or(Error::NotFound)
}

/// The badget form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetDraft {
    pub id: Option<DatabaseId>,
    pub code: String,
    pub amount: String,
    pub creator: String,
    pub remaining_balance: String,
    pub approved: bool,
}

#[derive(Serialize)]
struct BudgetPayload<'a> {
    pwp_code: &'a str,
    amountbadget: f64,
    createduser: &'a str,
    remainingbalance: f64,
    #[serde(rename = "Approved")]
    approved: bool,
}

impl Draft for BudgetDraft {
    type Record = Budget;
    type Context = ();

    const NOUN: &'static str = "Badget";

    fn from_record(budget: &Budget) -> Self {
        Self {
            id: Some(budget.id),
            code: budget.code.clone(),
            amount: budget.amount.to_string(),
            creator: budget.creator.clone(),
            remaining_balance: budget.remaining_balance.to_string(),
            approved: budget.approved,
        }
    }

    fn for_update(id: DatabaseId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    fn id(&self) -> Option<DatabaseId> {
        self.id
    }

    fn update_field(&mut self, name: &str, value: FieldInput) -> Result<(), Error> {
        match name {
            "pwp_code" => self.code = value.into_text(),
            "amountbadget" => self.amount = value.into_text(),
            "createduser" => self.creator = value.into_text(),
            "remainingbalance" => self.remaining_balance = value.into_text(),
            "approved" => self.approved = value.into_checked(),
            _ => return Err(Error::UnknownField(name.to_owned())),
        }

        Ok(())
    }

    /// Required text is checked with surrounding whitespace ignored, but saved as typed.
    fn mutation(&self, _: &()) -> Result<Mutation, Error> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::MissingCode.into());
        }

        let amount = parse_number(&self.amount)
            .filter(|amount| *amount >= 0.0)
            .ok_or(ValidationError::InvalidAmount)?;

        if self.creator.trim().is_empty() {
            return Err(ValidationError::MissingCreator.into());
        }

        let remaining_balance =
            parse_number(&self.remaining_balance).ok_or(ValidationError::InvalidRemainingBalance)?;

        let row = encode_record(&BudgetPayload {
            pwp_code: &self.code,
            amountbadget: amount,
            createduser: &self.creator,
            remainingbalance: remaining_balance,
            approved: self.approved,
        })?;

        Ok(match self.id {
            Some(id) => Mutation::Update(id, row),
            None => Mutation::Insert(row),
        })
    }
}

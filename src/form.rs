//! The record form controller: a draft record, its validation and the
//! create/update mutation it turns into.

use serde_json::Value;

use crate::{
    Error,
    alert::Alert,
    data_client::{DataClient, Row},
    database_id::DatabaseId,
    list_view::{ListView, Record},
};

/// A value posted for a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    Checkbox(bool),
}

impl FieldInput {
    /// Whether a posted checkbox value counts as checked.
    pub fn is_checked(value: &str) -> bool {
        matches!(value, "on" | "true" | "1")
    }

    /// The value as typed, checkboxes as "true" or "false".
    pub fn into_text(self) -> String {
        match self {
            FieldInput::Text(text) => text,
            FieldInput::Checkbox(checked) => checked.to_string(),
        }
    }

    /// The value as a checkbox state.
    pub fn into_checked(self) -> bool {
        match self {
            FieldInput::Text(text) => Self::is_checked(&text),
            FieldInput::Checkbox(checked) => checked,
        }
    }
}

/// A draft that failed validation. The first rule broken wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("PWP Code is required.")]
    MissingCode,
    #[error("Valid Amount Badget is required.")]
    InvalidAmount,
    #[error("Created User is required.")]
    MissingCreator,
    #[error("Valid Remaining Balance is required.")]
    InvalidRemainingBalance,
    #[error("Name is required")]
    MissingName,
    #[error("Please select a category first.")]
    NoCategorySelected,
}

impl ValidationError {
    /// The headline for the alert that reports this error.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::NoCategorySelected => "No Category Selected",
            _ => "Validation Error",
        }
    }
}

/// Parse a required numeric field. Blank, unparsable and non-finite input is rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    text.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// An empty optional text field is stored as null, anything else as typed.
pub fn optional_text(text: &str) -> Value {
    if text.is_empty() {
        Value::Null
    } else {
        Value::from(text)
    }
}

/// The write a valid draft turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Insert(Row),
    Update(DatabaseId, Row),
}

/// The editable fields of a record kind.
pub trait Draft: Default + Clone {
    /// The record the draft is saved as.
    type Record: Record;
    /// What the draft needs besides its own fields to be saved, e.g. the selected category.
    type Context;

    /// The record kind as shown in notifications, e.g. "Badget".
    const NOUN: &'static str;

    /// A draft holding the fields of `record`.
    fn from_record(record: &Self::Record) -> Self;

    /// An empty draft that updates the record `id` once submitted.
    fn for_update(id: DatabaseId) -> Self;

    /// The ID of the record being edited, `None` when creating one.
    fn id(&self) -> Option<DatabaseId>;

    /// Set the field `name` to `value`.
    ///
    /// # Errors
    /// Returns [Error::UnknownField] if the draft has no field `name`.
    fn update_field(&mut self, name: &str, value: FieldInput) -> Result<(), Error>;

    /// Validate the draft and build the insert or update that saves it.
    ///
    /// # Errors
    /// Returns [Error::Validation] for the first rule the draft breaks.
    fn mutation(&self, context: &Self::Context) -> Result<Mutation, Error>;
}

/// A form for creating or editing one record.
#[derive(Debug, Clone, Default)]
pub struct RecordForm<D: Draft> {
    draft: D,
    is_open: bool,
}

impl<D: Draft> RecordForm<D> {
    /// Open the form, editing `record` or creating a new record when `None`.
    pub fn begin_edit(&mut self, record: Option<&D::Record>) {
        self.draft = record.map(D::from_record).unwrap_or_default();
        self.is_open = true;
    }

    /// Open the form for a full update of the record `id`.
    ///
    /// Every field is expected to be supplied with [RecordForm::update_field].
    pub fn begin_update(&mut self, id: DatabaseId) {
        self.draft = D::for_update(id);
        self.is_open = true;
    }

    /// Set one field of the draft.
    pub fn update_field(&mut self, name: &str, value: FieldInput) -> Result<(), Error> {
        self.draft.update_field(name, value)
    }

    /// Set the fields of a posted form.
    ///
    /// Unknown fields are rejected.
    pub fn update_fields<I>(&mut self, fields: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in fields {
            self.update_field(&name, FieldInput::Text(value))?;
        }

        Ok(())
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Close the form and discard the draft.
    pub fn close(&mut self) {
        self.draft = D::default();
        self.is_open = false;
    }

    /// Validate and save the draft, then reload `list`.
    ///
    /// Nothing is sent to `client` if the draft is invalid. On failure the form
    /// stays open with the draft as it was.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the draft is invalid, or the error from the
    /// data service if the write failed.
    pub async fn submit<C: DataClient>(
        &mut self,
        client: &C,
        list: &mut ListView<D::Record>,
        context: &D::Context,
    ) -> Result<Alert, Error> {
        let collection = <D::Record as Record>::COLLECTION;

        let verb = match self.draft.mutation(context)? {
            Mutation::Insert(row) => {
                client.insert(collection, row).await?;
                "created"
            }
            Mutation::Update(id, row) => {
                client.update(collection, id, row).await?;
                "updated"
            }
        };

        self.close();

        if let Err(error) = list.load(client).await {
            tracing::error!("could not reload {} after saving: {error}", D::NOUN);
        }

        Ok(Alert::SuccessSimple {
            message: format!("{} {verb} successfully!", D::NOUN),
        })
    }
}

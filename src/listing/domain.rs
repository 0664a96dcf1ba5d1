//! The category listing record, its form draft and the queries for it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Error, ValidationError,
    category::{Category, get_category},
    data_client::{Collection, DataClient, SelectQuery, decode_rows, encode_record},
    database_id::DatabaseId,
    form::{Draft, FieldInput, Mutation, optional_text},
    list_view::{Deletable, ListView, Record},
};

/// An entry filed under a category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Listing {
    pub id: DatabaseId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_code: String,
    /// The category name when the listing was created.
    #[serde(rename = "parentname", default)]
    pub parent_name: Option<String>,
}

impl Record for Listing {
    type Scope = Option<Category>;

    const COLLECTION: Collection = Collection::CategoryListings;

    fn id(&self) -> DatabaseId {
        self.id
    }

    fn select_query(category: &Option<Category>) -> Option<SelectQuery> {
        category.as_ref().map(|category| {
            SelectQuery::all(Collection::CategoryListings)
                .eq("category_code", category.code.as_str())
                .order_by("name", true)
        })
    }

    fn matches(&self, lowercase_term: &str) -> bool {
        self.name.to_lowercase().contains(lowercase_term)
    }
}

impl Deletable for Listing {}

/// Fetch the listing with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such listing.
pub async fn get_listing<C: DataClient>(client: &C, id: DatabaseId) -> Result<Listing, Error> {
    let rows = client
        .select(&SelectQuery::all(Collection::CategoryListings).eq("id", id))
        .await?;

    decode_rows(rows)?.into_iter().next().ok_or(Error::NotFound)
}

/// Fetch the listing with `id` filed under the category `category_code`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such listing or it is filed under
/// another category.
pub async fn get_listing_under<C: DataClient>(
    client: &C,
    category_code: &str,
    id: DatabaseId,
) -> Result<Listing, Error> {
    let listing = get_listing(client, id).await?;

    if listing.category_code != category_code {
        return Err(Error::NotFound);
    }

    Ok(listing)
}

/// Resolve the category `code` and make it the scope of `listings`.
///
/// The listings are not fetched.
///
/// # Errors
/// Returns [Error::NotFound] if there is no category with that code.
pub async fn select_category<C: DataClient>(
    client: &C,
    listings: &mut ListView<Listing>,
    code: &str,
) -> Result<Category, Error> {
    let category = get_category(client, code).await?;
    listings.select_scope(Some(category.clone()));

    Ok(category)
}

/// The listing form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDraft {
    pub id: Option<DatabaseId>,
    pub name: String,
    pub description: String,
}

#[derive(Serialize)]
struct NewListing<'a> {
    name: &'a str,
    description: Value,
    category_code: &'a str,
    parentname: &'a str,
}

#[derive(Serialize)]
struct ListingChanges<'a> {
    name: &'a str,
    description: Value,
}

impl Draft for ListingDraft {
    type Record = Listing;
    type Context = Option<Category>;

    const NOUN: &'static str = "Listing";

    fn from_record(listing: &Listing) -> Self {
        Self {
            id: Some(listing.id),
            name: listing.name.clone(),
            description: listing.description.clone().unwrap_or_default(),
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
            "name" => self.name = value.into_text(),
            "description" => self.description = value.into_text(),
            _ => return Err(Error::UnknownField(name.to_owned())),
        }

        Ok(())
    }

    fn mutation(&self, category: &Option<Category>) -> Result<Mutation, Error> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName.into());
        }

        let category = category.as_ref().ok_or(ValidationError::NoCategorySelected)?;
        let name = self.name.as_str();
        let description = optional_text(&self.description);

        Ok(match self.id {
            Some(id) => Mutation::Update(id, encode_record(&ListingChanges { name, description })?),
            None => Mutation::Insert(encode_record(&NewListing {
                name,
                description,
                category_code: &category.code,
                parentname: &category.name,
            })?),
        })
    }
}

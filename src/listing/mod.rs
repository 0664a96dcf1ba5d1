//! Listings: the entries filed under a category, with pages to browse, create,
//! edit and delete them.

mod create_endpoint;
mod delete_endpoint;
mod domain;
mod edit_endpoint;
mod form_page;
mod listings_page;

pub use create_endpoint::create_listing_endpoint;
pub use delete_endpoint::delete_listing_endpoint;
pub use domain::{Listing, ListingDraft, get_listing, get_listing_under, select_category};
pub use edit_endpoint::update_listing_endpoint;
pub use form_page::{get_edit_listing_page, get_new_listing_page};
pub use listings_page::get_listings_page;

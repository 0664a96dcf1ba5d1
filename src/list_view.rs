//! The list-view controller shared by the budget and listing pages.
//!
//! A [ListView] fetches the full record set for its scope once and then filters
//! and pages through it in memory. Views get an immutable [ListSnapshot] of the
//! visible page.

use std::fmt::Debug;

use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    Error,
    data_client::{Collection, DataClient, SelectQuery, decode_rows},
    database_id::DatabaseId,
    pagination::{PaginationConfig, clamp_page, page_count},
};

/// A record kind that can be shown in a [ListView].
pub trait Record: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// What the list is narrowed to before fetching, e.g. the selected category.
    type Scope: Clone + PartialEq + Debug + Default + Send + Sync;

    /// The collection the records are stored in.
    const COLLECTION: Collection;

    fn id(&self) -> DatabaseId;

    /// The query that fetches every record in `scope`, or `None` if there is
    /// nothing to fetch (e.g. no category selected).
    fn select_query(scope: &Self::Scope) -> Option<SelectQuery>;

    /// Whether the record matches the search term. `lowercase_term` is never empty
    /// and is matched as typed, surrounding whitespace included.
    fn matches(&self, lowercase_term: &str) -> bool;
}

/// A record kind that users may delete from the list.
pub trait Deletable: Record {}

/// The visible page of a [ListView].
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<R> {
    /// The records on the current page.
    pub rows: Vec<R>,
    pub current_page: u64,
    pub total_pages: u64,
    /// The number of records that match the search term.
    pub filtered_count: u64,
    pub page_size: u64,
    pub search_term: String,
}

/// The records of one scope plus the search term and page cursor over them.
#[derive(Debug, Clone)]
pub struct ListView<R: Record> {
    records: Vec<R>,
    scope: R::Scope,
    search_term: String,
    current_page: u64,
    page_size: u64,
    loaded: bool,
}

impl<R: Record> ListView<R> {
    pub fn new(page_size: u64) -> Self {
        Self {
            records: Vec::new(),
            scope: R::Scope::default(),
            search_term: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
            loaded: false,
        }
    }

    pub fn scope(&self) -> &R::Scope {
        &self.scope
    }

    /// Switch to `scope`, returning whether it changed.
    ///
    /// The records of the previous scope are dropped and the cursor goes back to page 1.
    pub fn select_scope(&mut self, scope: R::Scope) -> bool {
        if self.scope == scope {
            return false;
        }

        self.scope = scope;
        self.records.clear();
        self.current_page = 1;
        self.loaded = false;

        true
    }

    /// Fetch every record in the current scope, replacing the records held.
    ///
    /// # Errors
    /// Returns the error from the data service. The records fetched previously are kept.
    pub async fn load<C: DataClient>(&mut self, client: &C) -> Result<(), Error> {
        let Some(query) = R::select_query(&self.scope) else {
            self.replace_records(Vec::new());
            return Ok(());
        };

        let rows = client.select(&query).await?;
        let records = decode_rows(rows)?;
        self.replace_records(records);

        Ok(())
    }

    /// Replace the records held, keeping the cursor in range.
    pub fn replace_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.loaded = true;
        self.current_page = clamp_page(self.current_page, self.total_pages());
    }

    /// Whether the records of the current scope have been fetched.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Filter by `term` and go back to page 1.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_owned();
        self.current_page = 1;
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Show `page_size` rows per page (at least one) and go back to page 1.
    pub fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    /// Go to `page`, clamped into the pages that exist.
    pub fn page(&mut self, page: u64) {
        self.current_page = clamp_page(page, self.total_pages());
    }

    pub fn total_pages(&self) -> u64 {
        page_count(self.filtered().count() as u64, self.page_size)
    }

    pub fn find(&self, id: DatabaseId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Drop the record with `id`, returning whether one was held.
    pub fn remove(&mut self, id: DatabaseId) -> bool {
        let count_before = self.records.len();
        self.records.retain(|record| record.id() != id);
        self.current_page = clamp_page(self.current_page, self.total_pages());

        self.records.len() != count_before
    }

    /// The visible page.
    pub fn snapshot(&self) -> ListSnapshot<R> {
        let filtered: Vec<&R> = self.filtered().collect();
        let filtered_count = filtered.len() as u64;
        let total_pages = page_count(filtered_count, self.page_size);
        let current_page = clamp_page(self.current_page, total_pages);

        let rows = filtered
            .into_iter()
            .skip(((current_page - 1) * self.page_size) as usize)
            .take(self.page_size as usize)
            .cloned()
            .collect();

        ListSnapshot {
            rows,
            current_page,
            total_pages,
            filtered_count,
            page_size: self.page_size,
            search_term: self.search_term.clone(),
        }
    }

    fn filtered(&self) -> impl Iterator<Item = &R> {
        let term = self.search_term.to_lowercase();

        self.records
            .iter()
            .filter(move |record| term.is_empty() || record.matches(&term))
    }
}

impl<R: Deletable> ListView<R> {
    /// Delete the record `id` from the data service, then drop it from the list.
    ///
    /// The list is not re-fetched.
    pub async fn delete<C: DataClient>(&mut self, client: &C, id: DatabaseId) -> Result<(), Error> {
        client.delete(R::COLLECTION, id).await?;
        self.remove(id);

        Ok(())
    }
}

/// The query parameters of a list page.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl ListQuery {
    /// Point `view` at the search term, page size and page in the query.
    ///
    /// The search term and page size only reset the cursor when they change.
    pub fn apply_to<R: Record>(&self, view: &mut ListView<R>, config: &PaginationConfig) {
        let search = self.search.as_deref().unwrap_or_default();
        if search != view.search_term() {
            view.set_search_term(search);
        }

        let page_size = config.page_size_or_default(self.per_page);
        if page_size != view.page_size() {
            view.set_page_size(page_size);
        }

        view.page(self.page.unwrap_or(config.default_page));
    }
}

#[cfg(test)]
mod list_view_tests {
    use serde::Deserialize;

    use crate::{
        Error,
        data_client::{Collection, DataClient, Row, SelectQuery, SqliteClient},
        database_id::DatabaseId,
        list_view::{Deletable, ListQuery, ListView, Record},
        pagination::PaginationConfig,
    };

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Fruit {
        id: DatabaseId,
        name: String,
    }

    impl Record for Fruit {
        type Scope = ();

        const COLLECTION: Collection = Collection::Categories;

        fn id(&self) -> DatabaseId {
            self.id
        }

        fn select_query(_: &()) -> Option<SelectQuery> {
            Some(SelectQuery::all(Collection::Categories).order_by("id", true))
        }

        fn matches(&self, lowercase_term: &str) -> bool {
            self.name.to_lowercase().contains(lowercase_term)
        }
    }

    impl Deletable for Fruit {}

    fn fruits(count: i64) -> Vec<Fruit> {
        (1..=count)
            .map(|id| Fruit {
                id,
                name: format!("Fruit {id}"),
            })
            .collect()
    }

    fn view_with(count: i64, page_size: u64) -> ListView<Fruit> {
        let mut view = ListView::new(page_size);
        view.replace_records(fruits(count));
        view
    }

    async fn client_with(names: &[&str]) -> SqliteClient {
        let client = SqliteClient::open_in_memory().unwrap();

        for (index, name) in names.iter().enumerate() {
            let mut row = Row::new();
            row.insert("name".to_owned(), (*name).into());
            row.insert("code".to_owned(), format!("C{index}").into());
            client.insert(Collection::Categories, row).await.unwrap();
        }

        client
    }

    #[test]
    fn paginates_records() {
        let mut view = view_with(12, 5);

        assert_eq!(view.total_pages(), 3);

        view.page(3);
        let snapshot = view.snapshot();
        assert_eq!(snapshot.current_page, 3);
        assert_eq!(snapshot.filtered_count, 12);
        assert_eq!(
            snapshot.rows.iter().map(|fruit| fruit.id).collect::<Vec<_>>(),
            vec![11, 12]
        );
    }

    #[test]
    fn clamps_requested_page() {
        let mut view = view_with(12, 5);

        view.page(5);
        assert_eq!(view.current_page(), 3);

        view.page(0);
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn total_pages_rounds_up_for_every_page_size() {
        for page_size in 1..=13 {
            for count in 0..=25 {
                let mut view = view_with(count, page_size);
                let want = (count as u64).div_ceil(page_size);

                assert_eq!(view.total_pages(), want, "count {count}, size {page_size}");

                view.page(u64::MAX);
                assert_eq!(view.current_page(), want.max(1));
            }
        }
    }

    #[test]
    fn search_is_case_insensitive_and_resets_page() {
        let mut view = view_with(12, 5);
        view.page(2);

        view.set_search_term("FRUIT 1");

        let snapshot = view.snapshot();
        assert_eq!(snapshot.current_page, 1);
        // "Fruit 1", "Fruit 10", "Fruit 11" and "Fruit 12"
        assert_eq!(snapshot.filtered_count, 4);
        assert_eq!(snapshot.search_term, "FRUIT 1");
    }

    #[test]
    fn search_term_is_not_trimmed() {
        let mut view = view_with(12, 5);

        view.set_search_term(" ");
        assert_eq!(view.snapshot().filtered_count, 12, "every name has a space");

        view.set_search_term(" 1 ");
        assert_eq!(view.snapshot().filtered_count, 0);

        view.set_search_term("  ");
        assert_eq!(view.snapshot().filtered_count, 0);
    }

    #[test]
    fn search_without_matches_shows_no_pages() {
        let mut view = view_with(12, 5);

        view.set_search_term("abc");

        let snapshot = view.snapshot();
        assert!(snapshot.rows.is_empty());
        assert_eq!(snapshot.filtered_count, 0);
        assert_eq!(snapshot.total_pages, 0);
        assert_eq!(snapshot.current_page, 1);
    }

    #[test]
    fn page_size_is_at_least_one_and_resets_page() {
        let mut view = view_with(12, 5);
        view.page(2);

        view.set_page_size(0);

        assert_eq!(view.page_size(), 1);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.total_pages(), 12);
    }

    #[test]
    fn removes_only_the_given_record() {
        let mut view = view_with(3, 5);

        assert!(view.remove(2));
        assert!(!view.remove(2));

        let ids: Vec<_> = view.snapshot().rows.iter().map(|fruit| fruit.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn remove_keeps_page_in_range() {
        let mut view = view_with(6, 5);
        view.page(2);

        view.remove(6);

        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn changing_scope_clears_records() {
        #[derive(Debug, Clone, Deserialize)]
        struct Scoped {
            id: DatabaseId,
        }

        impl Record for Scoped {
            type Scope = Option<String>;

            const COLLECTION: Collection = Collection::CategoryListings;

            fn id(&self) -> DatabaseId {
                self.id
            }

            fn select_query(scope: &Option<String>) -> Option<SelectQuery> {
                scope.as_ref().map(|code| {
                    SelectQuery::all(Collection::CategoryListings).eq("category_code", code.clone())
                })
            }

            fn matches(&self, _: &str) -> bool {
                true
            }
        }

        let mut view = ListView::<Scoped>::new(5);
        view.replace_records(vec![Scoped { id: 1 }]);

        assert!(!view.select_scope(None));
        assert_eq!(view.snapshot().filtered_count, 1);
        assert!(view.is_loaded());

        assert!(view.select_scope(Some("FOOD".to_owned())));
        assert_eq!(view.snapshot().filtered_count, 0);
        assert!(!view.is_loaded());
    }

    #[tokio::test]
    async fn loads_records() {
        let client = client_with(&["Apple", "Banana"]).await;
        let mut view = ListView::<Fruit>::new(5);

        view.load(&client).await.unwrap();

        assert_eq!(
            view.snapshot().rows,
            vec![
                Fruit {
                    id: 1,
                    name: "Apple".to_owned()
                },
                Fruit {
                    id: 2,
                    name: "Banana".to_owned()
                },
            ]
        );
    }

    #[tokio::test]
    async fn tracks_whether_scope_is_loaded() {
        let client = client_with(&["Apple"]).await;
        let mut view = ListView::<Fruit>::new(5);
        assert!(!view.is_loaded());

        view.load(&client).await.unwrap();
        assert!(view.is_loaded());
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_records() {
        let client = client_with(&["Apple"]).await;
        client
            .lock()
            .unwrap()
            .execute_batch("DROP TABLE category")
            .unwrap();
        let mut view = view_with(3, 5);

        let result = view.load(&client).await;

        assert!(matches!(result, Err(Error::DataService(_))), "got {result:?}");
        assert_eq!(view.snapshot().filtered_count, 3);
    }

    #[tokio::test]
    async fn delete_removes_record_remotely_and_locally() {
        let client = client_with(&["Apple", "Banana", "Cherry"]).await;
        let mut view = ListView::<Fruit>::new(5);
        view.load(&client).await.unwrap();

        view.delete(&client, 2).await.unwrap();

        let ids: Vec<_> = view.snapshot().rows.iter().map(|fruit| fruit.id).collect();
        assert_eq!(ids, vec![1, 3]);
        let remaining = client
            .select(&SelectQuery::all(Collection::Categories))
            .await
            .unwrap();
        assert_eq!(remaining.len(), 2);
    }

    #[tokio::test]
    async fn failed_delete_keeps_record() {
        let client = client_with(&["Apple"]).await;
        let mut view = view_with(3, 5);

        let result = view.delete(&client, 3).await;

        assert_eq!(result, Err(Error::DeleteMissingRecord));
        assert!(view.find(3).is_some());
    }

    #[test]
    fn query_only_resets_page_on_change() {
        let config = PaginationConfig::default();
        let mut view = view_with(30, 5);
        let query = ListQuery {
            search: None,
            page: Some(4),
            per_page: Some(5),
        };

        query.apply_to(&mut view, &config);
        assert_eq!(view.current_page(), 4);

        let query = ListQuery {
            search: Some("fruit".to_owned()),
            page: None,
            per_page: Some(10),
        };
        query.apply_to(&mut view, &config);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.page_size(), 10);
        assert_eq!(view.search_term(), "fruit");
    }

    #[test]
    fn query_falls_back_to_default_page_size() {
        let config = PaginationConfig::default();
        let mut view = view_with(30, 10);

        ListQuery {
            search: None,
            page: None,
            per_page: Some(7),
        }
        .apply_to(&mut view, &config);

        assert_eq!(view.page_size(), config.default_page_size);
    }
}

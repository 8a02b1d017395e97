//! List envelopes, client-side filtering and pagination for the CRUD
//! tables.
//!
//! The backend is inconsistent about list shapes: some endpoints wrap a
//! page in `{ data: { data: [...], total } }`, some return
//! `{ data: [...] }`, some a bare array, and detail endpoints a single
//! object. [`ListResponse`] accepts all of them.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::models::access::AccessItem;
use crate::models::app::AppItem;
use crate::models::module::ModuleRecord;
use crate::models::role::RoleItem;
use crate::models::user::User;

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 15,
        }
    }
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Index of the first item on this page. Page 0 is treated as page 1.
    pub fn offset(&self) -> u64 {
        self.page.max(1).saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Any list shape the backend returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Items(Vec<T>),
    Envelope {
        data: Box<ListResponse<T>>,
        #[serde(default)]
        total: Option<u64>,
    },
    Single(T),
}

impl<T> ListResponse<T> {
    /// Normalize into a page. Bare arrays are taken as-is (the server
    /// did not paginate them) with `total` set to their length.
    pub fn into_page(self, pagination: Pagination) -> PaginatedResult<T> {
        match self {
            ListResponse::Items(items) => PaginatedResult {
                total: items.len() as u64,
                items,
                page: pagination.page,
                per_page: pagination.per_page,
            },
            ListResponse::Envelope { data, total } => {
                let mut page = data.into_page(pagination);
                if let Some(total) = total {
                    page.total = total;
                }
                page
            }
            ListResponse::Single(item) => PaginatedResult {
                items: vec![item],
                total: 1,
                page: pagination.page,
                per_page: pagination.per_page,
            },
        }
    }
}

/// Slice one page out of an already-filtered list.
pub fn paginate<T>(items: Vec<T>, pagination: Pagination) -> PaginatedResult<T> {
    let total = items.len() as u64;
    let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    let per_page = usize::try_from(pagination.per_page).unwrap_or(usize::MAX);
    PaginatedResult {
        items: items.into_iter().skip(offset).take(per_page).collect(),
        total,
        page: pagination.page.max(1),
        per_page: pagination.per_page,
    }
}

/// Records that can be narrowed by the search panel.
pub trait Searchable {
    /// Fields the free-text query looks at.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Text value of a named field, if the record has one.
    fn field(&self, key: &str) -> Option<Cow<'_, str>>;
}

/// Per-field search terms plus an optional free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    terms: Vec<(String, String)>,
    query: Option<String>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to contain `needle`. Blank needles are ignored,
    /// like empty inputs in the search panel.
    pub fn term(mut self, key: impl Into<String>, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        if !needle.trim().is_empty() {
            self.terms.push((key.into(), needle.trim().to_lowercase()));
        }
        self
    }

    pub fn query(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        self.query = (!q.trim().is_empty()).then(|| q.trim().to_lowercase());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.query.is_none()
    }

    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        let contains = |key: &str, needle: &str| {
            item.field(key)
                .is_some_and(|v| v.to_lowercase().contains(needle))
        };

        let terms_ok = self.terms.iter().all(|(key, needle)| contains(key, needle));
        let query_ok = self
            .query
            .as_deref()
            .is_none_or(|q| T::SEARCH_FIELDS.iter().any(|key| contains(key, q)));
        terms_ok && query_ok
    }

    pub fn apply<T: Searchable>(&self, items: Vec<T>) -> Vec<T> {
        if self.is_empty() {
            return items;
        }
        items.into_iter().filter(|i| self.matches(i)).collect()
    }
}

fn text(value: &Option<String>) -> Option<Cow<'_, str>> {
    value.as_deref().map(Cow::Borrowed)
}

impl Searchable for ModuleRecord {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "url_view", "url", "description"];

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "name" => Some(Cow::Borrowed(&self.name)),
            "url" => text(&self.urls.url),
            "url_view" => text(&self.urls.view),
            "url_create" => text(&self.urls.create),
            "description" => text(&self.description),
            "pk_module_id" | "id" => Some(Cow::Owned(self.id.to_string())),
            _ => None,
        }
    }
}

impl Searchable for RoleItem {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "description"];

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "name" => Some(Cow::Borrowed(&self.name)),
            "description" => text(&self.description),
            "app" => self.app.as_ref().map(|a| Cow::Borrowed(a.name.as_str())),
            _ => None,
        }
    }
}

impl Searchable for AppItem {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "key", "description"];

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "name" => Some(Cow::Borrowed(&self.name)),
            "key" => Some(Cow::Borrowed(&self.key)),
            "description" => text(&self.description),
            _ => None,
        }
    }
}

impl Searchable for AccessItem {
    const SEARCH_FIELDS: &'static [&'static str] = &["module"];

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "module" => self.module.as_ref().map(|m| Cow::Borrowed(m.name.as_str())),
            "fk_module_id" => Some(Cow::Owned(self.module_id.to_string())),
            "fk_role_id" => Some(Cow::Owned(self.role_id.to_string())),
            _ => None,
        }
    }
}

impl Searchable for User {
    const SEARCH_FIELDS: &'static [&'static str] = &["username", "email", "full_name"];

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "username" => Some(Cow::Borrowed(&self.username)),
            "email" => Some(Cow::Borrowed(&self.email)),
            "full_name" => Some(Cow::Borrowed(&self.full_name)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> Vec<User> {
        serde_json::from_value(json!([
            { "pk_user_id": 1, "username": "alice", "email": "alice@example.com", "full_name": "Alice Hartono" },
            { "pk_user_id": 2, "username": "bob", "email": "bob@example.com", "full_name": "Bob Santoso" },
            { "pk_user_id": 3, "username": "carol", "email": "carol@corp.id", "full_name": "Carol Wijaya" }
        ]))
        .unwrap()
    }

    #[test]
    fn nested_envelope_keeps_server_total() {
        let raw = json!({
            "data": {
                "data": [
                    { "pk_app_id": 1, "name": "DMS", "key": "dms" },
                    { "pk_app_id": 2, "name": "HR", "key": "hr" }
                ],
                "total": 42,
                "per_page": 2
            }
        });
        let resp: ListResponse<AppItem> = serde_json::from_value(raw).unwrap();
        let page = resp.into_page(Pagination::new(3, 2));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 42);
        assert_eq!(page.page, 3);
    }

    #[test]
    fn bare_array_total_is_its_length() {
        let resp: ListResponse<AppItem> =
            serde_json::from_value(json!([{ "pk_app_id": 1, "name": "DMS", "key": "dms" }])).unwrap();
        let page = resp.into_page(Pagination::default());
        assert_eq!(page.total, 1);
        assert_eq!(page.per_page, 15);
    }

    #[test]
    fn single_object_becomes_one_item_page() {
        let resp: ListResponse<AppItem> =
            serde_json::from_value(json!({ "pk_app_id": 9, "name": "DMS", "key": "dms" })).unwrap();
        let page = resp.into_page(Pagination::default());
        assert_eq!(page.items[0].id, 9);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn filter_terms_are_case_insensitive_and_conjunctive() {
        let filter = SearchFilter::new()
            .term("email", "EXAMPLE.com")
            .term("full_name", "santoso");
        let hits = filter.apply(users());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "bob");
    }

    #[test]
    fn blank_terms_are_ignored() {
        let filter = SearchFilter::new().term("username", "  ").query("");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(users()).len(), 3);
    }

    #[test]
    fn free_text_query_searches_declared_fields() {
        let hits = SearchFilter::new().query("wijaya").apply(users());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 3);
    }

    #[test]
    fn paginate_slices_requested_page() {
        let page = paginate(users(), Pagination::new(2, 2));
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username, "carol");

        let past_end = paginate(users(), Pagination::new(5, 2));
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 3);
    }

    #[test]
    fn page_zero_is_first_page() {
        assert_eq!(Pagination::new(0, 10).offset(), 0);
        assert_eq!(Pagination::new(3, 10).offset(), 20);
    }
}

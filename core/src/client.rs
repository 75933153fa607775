//! Docs API client: fetch, validate, deserialize, paginate.
//!
//! # Design
//! `DocsClient` builds plain `HttpRequest` values and hands them to a
//! `Transport`; it never touches sockets itself. Every call is one blocking
//! round trip followed by a status check against the status the caller
//! expects, envelope extraction and schema deserialization.
//!
//! Paged endpoints remember the last `(page, pages)` pair per endpoint key,
//! so calling `fetch_page` again without an explicit page walks forward
//! until the last page and then returns `None`. The cursor update needs
//! `&mut self`; share a client across threads behind a mutex.

use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{DocsError, Result};
use crate::http::{BasicAuth, HttpRequest, Transport, UreqTransport};
use crate::page::Page;
use crate::pagination::{Cursor, PageRequest, PaginationState};
use crate::types::{Article, Category, Collection, Schema};

const BASIC_AUTH_PASSWORD: &str = "x";

/// Append a `fields` selection to `path`. Empty selections leave it as is.
///
/// The selection becomes part of the endpoint key, so the same listing
/// fetched with different fields keeps separate cursors.
pub fn with_fields<S: AsRef<str>>(path: &str, fields: &[S]) -> String {
    if fields.is_empty() {
        return path.to_string();
    }
    let joined = fields.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
    format!("{path}?fields={joined}")
}

/// Options shared by the listing helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub fields: Vec<String>,
    /// Explicit page; `None` continues from the remembered cursor.
    pub page: Option<u32>,
    /// Extra query parameters forwarded verbatim (`status`, `sort`, ...).
    pub filters: Vec<(String, String)>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((name.into(), value.into()));
        self
    }

    fn filter_refs(&self) -> Vec<(&str, &str)> {
        self.filters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Blocking client for the Help Scout Docs API.
#[derive(Debug)]
pub struct DocsClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
    pagination: PaginationState,
}

impl DocsClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Build a client from `HELPSCOUT_DOCS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }
}

impl<T: Transport> DocsClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            pagination: PaginationState::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Describe a GET for `path` (relative to the base URL) with `query`.
    pub fn build_request(&self, path: &str, query: Vec<(String, String)>) -> HttpRequest {
        HttpRequest {
            url: format!("{}{}", self.config.base_url, path.trim_start_matches('/')),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
                ("Accept-Encoding".to_string(), "gzip".to_string()),
            ],
            basic_auth: Some(BasicAuth {
                username: self.config.api_key.clone(),
                password: BASIC_AUTH_PASSWORD.to_string(),
            }),
            query,
        }
    }

    /// One round trip: send, check the status, parse the body as JSON.
    fn call_server(&self, path: &str, expected_status: u16, query: Vec<(String, String)>) -> Result<Value> {
        let request = self.build_request(path, query);
        debug!(url = %request.url, query = ?request.query, expected_status, "calling docs API");
        let response = self.transport.execute(&request)?;
        crate::status::check_status(response.status, expected_status)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Fetch a single record enveloped under `S`'s lower-cased name.
    pub fn fetch_item<S: Schema>(&self, path: &str, expected_status: u16, fields: &[&str]) -> Result<S> {
        let path = with_fields(path, fields);
        let mut body = self.call_server(&path, expected_status, Vec::new())?;
        let key = S::envelope_key();
        let envelope = take_envelope(&mut body, &key)?;
        crate::deserialize::parse(envelope)?.ok_or(DocsError::MissingEnvelope(key))
    }

    /// Fetch one page of `S` records enveloped under `envelope_key`.
    ///
    /// `path` is the endpoint key. With `page == None` the remembered cursor
    /// decides the page; once the last page has been returned, further
    /// implicit calls return `Ok(None)` without a request.
    ///
    /// A cursor the server reported inconsistently (`pages == 0`, or `page`
    /// past `pages`) is never exhausted: each implicit call re-requests the
    /// first page. Callers walking such a listing should stop on an empty
    /// page or pass explicit pages.
    pub fn fetch_page<S: Schema>(
        &mut self,
        path: &str,
        envelope_key: &str,
        expected_status: u16,
        query: &[(&str, &str)],
        page: Option<u32>,
    ) -> Result<Option<Page<S>>> {
        let next = self.pagination.resolve_next_page(path, page);
        if next == PageRequest::Exhausted {
            debug!(endpoint = path, "all pages already fetched");
            return Ok(None);
        }

        let mut params: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(page) = next.page_param() {
            params.push(("page".to_string(), page.to_string()));
        }

        let mut body = self.call_server(path, expected_status, params)?;
        let envelope = take_envelope(&mut body, envelope_key)?;
        let page: Page<S> = Page::from_envelope(envelope)?;

        self.pagination.record_page(path, page.page, page.pages);
        debug!(
            endpoint = path,
            page = ?page.page,
            pages = ?page.pages,
            items = page.len(),
            "fetched page"
        );
        Ok(Some(page))
    }

    /// Forget the cursor for `endpoint`, or every cursor when `None`.
    ///
    /// Returns `false` when the named endpoint had no cursor.
    pub fn reset_state(&mut self, endpoint: Option<&str>) -> bool {
        self.pagination.reset(endpoint)
    }

    pub fn cursor(&self, endpoint: &str) -> Option<Cursor> {
        self.pagination.cursor(endpoint)
    }

    pub fn list_articles(&mut self, category_id: &str, params: &ListParams) -> Result<Option<Page<Article>>> {
        let path = with_fields(&format!("categories/{category_id}/articles"), &params.fields);
        self.fetch_page(&path, "articles", 200, &params.filter_refs(), params.page)
    }

    pub fn get_article(&self, article_id: &str, fields: &[&str]) -> Result<Article> {
        self.fetch_item(&format!("articles/{article_id}"), 200, fields)
    }

    pub fn list_collections(&mut self, params: &ListParams) -> Result<Option<Page<Collection>>> {
        let path = with_fields("collections", &params.fields);
        self.fetch_page(&path, "collections", 200, &params.filter_refs(), params.page)
    }

    pub fn list_categories(&mut self, collection_id: &str, params: &ListParams) -> Result<Option<Page<Category>>> {
        let path = with_fields(&format!("collections/{collection_id}/categories"), &params.fields);
        self.fetch_page(&path, "categories", 200, &params.filter_refs(), params.page)
    }
}

/// Remove and return the object stored under `key` in a parsed body.
fn take_envelope(body: &mut Value, key: &str) -> Result<Value> {
    body.as_object_mut()
        .and_then(|map| map.remove(key))
        .ok_or_else(|| DocsError::MissingEnvelope(key.to_string()))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::http::HttpResponse;
    use crate::types::Id;

    /// Replays canned responses and records every request it receives.
    #[derive(Default)]
    struct FakeTransport {
        responses: RefCell<VecDeque<HttpResponse>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn push(&self, status: u16, body: &str) {
            self.responses.borrow_mut().push_back(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            });
        }

        fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }

        fn last_request(&self) -> HttpRequest {
            self.requests.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for FakeTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| DocsError::Transport("no canned response".to_string()))
        }
    }

    fn client() -> DocsClient<FakeTransport> {
        DocsClient::with_transport(
            ClientConfig::new("api-key").with_base_url("http://localhost:3000/v1"),
            FakeTransport::default(),
        )
    }

    fn collections_page(page: u32, pages: u32) -> String {
        format!(
            r#"{{"collections": {{"page": {page}, "pages": {pages}, "count": {count},
                "items": [{{"id": "c{page}", "name": "Collection {page}"}}]}}}}"#,
            count = pages
        )
    }

    #[test]
    fn build_request_sets_headers_and_auth() {
        let req = client().build_request("/collections", Vec::new());
        assert_eq!(req.url, "http://localhost:3000/v1/collections");
        assert!(req.headers.contains(&("Accept".to_string(), "application/json".to_string())));
        assert!(req
            .headers
            .contains(&("Accept-Encoding".to_string(), "gzip".to_string())));
        assert_eq!(
            req.basic_auth,
            Some(BasicAuth {
                username: "api-key".to_string(),
                password: "x".to_string()
            })
        );
    }

    #[test]
    fn with_fields_joins_names() {
        assert_eq!(with_fields("articles/1", &["id", "name"]), "articles/1?fields=id,name");
        assert_eq!(with_fields::<&str>("articles/1", &[]), "articles/1");
    }

    #[test]
    fn fetch_item_unwraps_envelope() {
        let client = client();
        client.transport.push(200, r#"{"article": {"id": 5, "Name": "x"}}"#);
        let article: Article = client.fetch_item("articles/5", 200, &[]).unwrap();
        assert_eq!(article.id, Some(Id::Number(5)));
        assert_eq!(article.name.as_deref(), Some("x"));
        assert_eq!(client.transport.last_request().url, "http://localhost:3000/v1/articles/5");
    }

    #[test]
    fn fetch_item_appends_fields() {
        let client = client();
        client.transport.push(200, r#"{"article": {"id": "a1"}}"#);
        client.get_article("a1", &["id", "text"]).unwrap();
        assert_eq!(
            client.transport.last_request().url,
            "http://localhost:3000/v1/articles/a1?fields=id,text"
        );
    }

    #[test]
    fn fetch_item_status_mismatch_is_api_error() {
        let client = client();
        client.transport.push(404, "");
        let err = client.get_article("missing", &[]).unwrap_err();
        assert!(matches!(
            err,
            DocsError::Api {
                status: 404,
                message: "Resource Not Found"
            }
        ));
    }

    #[test]
    fn fetch_item_missing_envelope() {
        let client = client();
        client.transport.push(200, r#"{"collection": {"id": 1}}"#);
        let err = client.get_article("a1", &[]).unwrap_err();
        assert!(matches!(err, DocsError::MissingEnvelope(key) if key == "article"));

        client.transport.push(200, r#"{"article": null}"#);
        assert!(matches!(
            client.get_article("a1", &[]).unwrap_err(),
            DocsError::MissingEnvelope(_)
        ));
    }

    #[test]
    fn fetch_item_malformed_body() {
        let client = client();
        client.transport.push(200, "not json");
        let err = client.get_article("a1", &[]).unwrap_err();
        assert!(matches!(err, DocsError::Deserialization(_)));
    }

    #[test]
    fn pagination_walks_to_exhaustion() {
        let mut client = client();
        for page in 1..=3 {
            client.transport.push(200, &collections_page(page, 3));
        }

        let first = client.list_collections(&ListParams::new()).unwrap().unwrap();
        assert_eq!(first.page, Some(1));
        assert_eq!(client.transport.last_request().query_param("page"), None);

        let second = client.list_collections(&ListParams::new()).unwrap().unwrap();
        assert_eq!(second.page, Some(2));
        assert_eq!(client.transport.last_request().query_param("page"), Some("2"));

        client.list_collections(&ListParams::new()).unwrap().unwrap();
        assert_eq!(client.transport.last_request().query_param("page"), Some("3"));

        assert!(client.list_collections(&ListParams::new()).unwrap().is_none());
        assert!(client.list_collections(&ListParams::new()).unwrap().is_none());
        assert_eq!(client.transport.request_count(), 3);
        assert_eq!(
            client.cursor("collections"),
            Some(Cursor {
                page: Some(3),
                pages: Some(3)
            })
        );
    }

    #[test]
    fn inconsistent_cursor_keeps_requesting_first_page() {
        let mut client = client();
        client.transport.push(200, r#"{"collections": {"page": 1, "pages": 0, "count": 0, "items": []}}"#);
        client.transport.push(200, r#"{"collections": {"page": 1, "pages": 0, "count": 0, "items": []}}"#);
        client.transport.push(200, &collections_page(5, 2));
        client.transport.push(200, &collections_page(1, 2));

        for expected_requests in 1..=4 {
            let page = client.list_collections(&ListParams::new()).unwrap();
            assert!(page.is_some());
            assert_eq!(client.transport.last_request().query_param("page"), None);
            assert_eq!(client.transport.request_count(), expected_requests);
        }
        assert_eq!(
            client.cursor("collections"),
            Some(Cursor {
                page: Some(1),
                pages: Some(2)
            })
        );
    }

    #[test]
    fn reset_one_endpoint_restarts_from_first_page() {
        let mut client = client();
        client.transport.push(200, &collections_page(1, 1));
        client.list_collections(&ListParams::new()).unwrap().unwrap();
        assert!(client.list_collections(&ListParams::new()).unwrap().is_none());

        assert!(client.reset_state(Some("collections")));
        assert!(!client.reset_state(Some("collections")));

        client.transport.push(200, &collections_page(1, 1));
        client.list_collections(&ListParams::new()).unwrap().unwrap();
        assert_eq!(client.transport.request_count(), 2);
        assert_eq!(client.transport.last_request().query_param("page"), None);
    }

    #[test]
    fn reset_all_clears_every_endpoint() {
        let mut client = client();
        client.transport.push(200, &collections_page(1, 1));
        client.transport.push(
            200,
            r#"{"categories": {"page": 1, "pages": 1, "count": 0, "items": []}}"#,
        );
        client.list_collections(&ListParams::new()).unwrap();
        client.list_categories("c1", &ListParams::new()).unwrap();

        assert!(client.reset_state(None));
        assert!(client.cursor("collections").is_none());
        assert!(client.cursor("collections/c1/categories").is_none());
    }

    #[test]
    fn explicit_page_and_filters_are_forwarded() {
        let mut client = client();
        client.transport.push(
            200,
            r#"{"articles": {"page": 2, "pages": 4, "count": 31, "items": [{"id": "a1"}]}}"#,
        );
        let params = ListParams::new()
            .fields(["id", "name"])
            .filter("status", "published")
            .page(2);
        let page = client.list_articles("cat1", &params).unwrap().unwrap();
        assert_eq!(page.count, Some(31));

        let req = client.transport.last_request();
        assert_eq!(
            req.url,
            "http://localhost:3000/v1/categories/cat1/articles?fields=id,name"
        );
        assert_eq!(req.query_param("status"), Some("published"));
        assert_eq!(req.query_param("page"), Some("2"));
        assert!(client.cursor("categories/cat1/articles?fields=id,name").is_some());
    }

    #[test]
    fn explicit_page_ignores_exhausted_cursor() {
        let mut client = client();
        client.transport.push(200, &collections_page(1, 1));
        client.transport.push(200, &collections_page(1, 1));
        client.list_collections(&ListParams::new()).unwrap();
        let again = client.list_collections(&ListParams::new().page(1)).unwrap();
        assert!(again.is_some());
        assert_eq!(client.transport.last_request().query_param("page"), Some("1"));
    }

    #[test]
    fn failed_page_fetch_keeps_previous_cursor() {
        let mut client = client();
        client.transport.push(200, &collections_page(1, 3));
        client.transport.push(503, "");
        client.list_collections(&ListParams::new()).unwrap();
        let err = client.list_collections(&ListParams::new()).unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(client.cursor("collections").unwrap().page, Some(1));
    }

    #[test]
    fn page_with_bad_item_fails_whole_call() {
        let mut client = client();
        client.transport.push(
            200,
            r#"{"collections": {"page": 1, "pages": 1, "items": [{"id": "c1"}, {"name": {}}]}}"#,
        );
        let err = client.list_collections(&ListParams::new()).unwrap_err();
        assert!(matches!(err, DocsError::Deserialization(_)));
        assert!(client.cursor("collections").is_none());
    }

    #[test]
    fn clients_do_not_share_cursors() {
        let mut a = client();
        let b = client();
        a.transport.push(200, &collections_page(1, 2));
        a.list_collections(&ListParams::new()).unwrap();
        assert!(a.cursor("collections").is_some());
        assert!(b.cursor("collections").is_none());
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "test-key";
pub const PAGE_SIZE: usize = 2;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub visibility: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub collection_id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub collection_id: String,
    pub category_id: String,
    pub name: String,
    pub text: String,
    pub public_url: String,
    pub status: String,
    pub keywords: Vec<String>,
}

/// In-memory docs site served by the mock API.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub collections: Vec<Collection>,
    pub categories: Vec<Category>,
    pub articles: Vec<Article>,
}

impl Catalog {
    /// Five collections; the first holds three categories, the first of
    /// which holds five articles.
    pub fn seeded() -> Self {
        let mut catalog = Catalog::default();
        for c in 1..=5 {
            catalog.collections.push(Collection {
                id: new_id(),
                name: format!("Collection {c}"),
                visibility: "public".to_string(),
            });
        }
        let collection_id = catalog.collections[0].id.clone();
        for c in 1..=3 {
            catalog.categories.push(Category {
                id: new_id(),
                collection_id: collection_id.clone(),
                name: format!("Category {c}"),
            });
        }
        let category_id = catalog.categories[0].id.clone();
        for a in 1..=5 {
            let id = new_id();
            catalog.articles.push(Article {
                public_url: format!("https://docs.example.com/article/{id}"),
                id,
                collection_id: collection_id.clone(),
                category_id: category_id.clone(),
                name: format!("Article {a}"),
                text: format!("<p>Body of article {a}</p>"),
                status: if a % 2 == 0 { "notpublished" } else { "published" }.to_string(),
                keywords: vec![format!("kw{a}")],
            });
        }
        catalog
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug)]
pub struct AppState {
    pub catalog: Catalog,
    pub api_key: String,
}

pub type Db = Arc<AppState>;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub fields: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemQuery {
    pub fields: Option<String>,
}

pub fn app() -> Router {
    app_with(Catalog::seeded(), DEFAULT_API_KEY)
}

pub fn app_with(catalog: Catalog, api_key: &str) -> Router {
    let db: Db = Arc::new(AppState {
        catalog,
        api_key: api_key.to_string(),
    });
    let v1 = Router::new()
        .route("/collections", get(list_collections))
        .route("/collections/{id}/categories", get(list_categories))
        .route("/categories/{id}/articles", get(list_articles))
        .route("/articles/{id}", get(get_article))
        .with_state(db);
    Router::new().nest("/v1", v1)
}

pub async fn run(listener: TcpListener, catalog: Catalog) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(catalog, DEFAULT_API_KEY)).await
}

/// Accept only `Basic base64(api_key:x)`.
fn authorize(db: &Db, headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{}:x", db.api_key))
    );
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Keep only the requested fields of a serialized record.
fn select_fields<T: Serialize>(record: &T, fields: Option<&str>) -> Value {
    let value = serde_json::to_value(record).unwrap_or(Value::Null);
    match (fields, value) {
        (Some(fields), Value::Object(map)) => {
            let wanted: Vec<&str> = fields.split(',').map(str::trim).collect();
            let selected: Map<String, Value> = map
                .into_iter()
                .filter(|(key, _)| wanted.contains(&key.as_str()))
                .collect();
            Value::Object(selected)
        }
        (_, value) => value,
    }
}

/// Slice `records` into the requested page and wrap it in `envelope`.
fn paged<T: Serialize>(envelope: &str, records: &[&T], query: &ListQuery) -> Json<Value> {
    let count = records.len();
    let pages = count.div_ceil(PAGE_SIZE).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let items: Vec<Value> = records
        .iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .map(|record| select_fields(*record, query.fields.as_deref()))
        .collect();
    let mut body = Map::new();
    body.insert(
        envelope.to_string(),
        json!({
            "page": page,
            "pages": pages,
            "count": count,
            "items": items,
        }),
    );
    Json(Value::Object(body))
}

async fn list_collections(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, StatusCode> {
    authorize(&db, &headers)?;
    let collections: Vec<&Collection> = db.catalog.collections.iter().collect();
    Ok(paged("collections", &collections, &query))
}

async fn list_categories(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, StatusCode> {
    authorize(&db, &headers)?;
    if !db.catalog.collections.iter().any(|c| c.id == id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let categories: Vec<&Category> = db
        .catalog
        .categories
        .iter()
        .filter(|c| c.collection_id == id)
        .collect();
    Ok(paged("categories", &categories, &query))
}

async fn list_articles(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, StatusCode> {
    authorize(&db, &headers)?;
    if !db.catalog.categories.iter().any(|c| c.id == id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let articles: Vec<&Article> = db
        .catalog
        .articles
        .iter()
        .filter(|a| a.category_id == id)
        .filter(|a| query.status.as_deref().map_or(true, |s| a.status == s))
        .collect();
    Ok(paged("articles", &articles, &query))
}

async fn get_article(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Value>, StatusCode> {
    authorize(&db, &headers)?;
    let article = db
        .catalog
        .articles
        .iter()
        .find(|a| a.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(
        json!({ "article": select_fields(article, query.fields.as_deref()) }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_shape() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.collections.len(), 5);
        assert_eq!(catalog.categories.len(), 3);
        assert_eq!(catalog.articles.len(), 5);
        assert!(catalog
            .articles
            .iter()
            .all(|a| a.category_id == catalog.categories[0].id));
    }

    #[test]
    fn article_serializes_camel_case() {
        let catalog = Catalog::seeded();
        let json = serde_json::to_value(&catalog.articles[0]).unwrap();
        assert!(json.get("publicUrl").is_some());
        assert!(json.get("categoryId").is_some());
        assert!(json.get("public_url").is_none());
    }

    #[test]
    fn select_fields_keeps_only_requested_keys() {
        let catalog = Catalog::seeded();
        let value = select_fields(&catalog.articles[0], Some("id,name"));
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("id"));
        assert!(map.contains_key("name"));
    }

    #[test]
    fn select_fields_without_selection_is_full_record() {
        let catalog = Catalog::seeded();
        let value = select_fields(&catalog.collections[0], None);
        assert_eq!(value["name"], "Collection 1");
        assert_eq!(value["visibility"], "public");
    }

    #[test]
    fn paged_splits_records() {
        let catalog = Catalog::seeded();
        let collections: Vec<&Collection> = catalog.collections.iter().collect();
        let query = ListQuery {
            page: Some(3),
            ..ListQuery::default()
        };
        let Json(body) = paged("collections", &collections, &query);
        assert_eq!(body["collections"]["page"], 3);
        assert_eq!(body["collections"]["pages"], 3);
        assert_eq!(body["collections"]["count"], 5);
        assert_eq!(body["collections"]["items"].as_array().unwrap().len(), 1);
    }
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;
use vn_core::{taxonomy, Error, IngestOutcome, Page};

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "error": message })))
}

fn internal_error(e: Error) -> (StatusCode, Json<Value>) {
    tracing::error!("request failed: {}", e);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
}

fn pagination<T>(page: &Page<T>) -> Value {
    json!({
        "total": page.total,
        "page": page.page,
        "limit": page.limit,
        "totalPages": page.total_pages,
        "hasNextPage": page.has_next_page,
        "hasPrevPage": page.has_prev_page,
    })
}

fn validate_paging(page: usize, limit: usize) -> Result<(), (StatusCode, Json<Value>)> {
    if page < 1 {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Invalid page parameter",
        ));
    }
    if limit < 1 || limit > MAX_LIMIT {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Invalid limit parameter (must be between 1 and 100)",
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub query: Option<String>,
    pub published_only: Option<bool>,
}

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    validate_paging(page, limit)?;

    let query = params.query.unwrap_or_default();
    let result = if query.trim().is_empty() {
        state
            .store
            .list(page, limit, params.published_only.unwrap_or(true))
            .await
    } else {
        state.store.search(&query, page, limit).await
    }
    .map_err(internal_error)?;

    Ok(Json(json!({
        "success": true,
        "posts": result.data,
        "pagination": pagination(&result),
    })))
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult {
    let post = state
        .store
        .get_by_slug(&slug)
        .await
        .map_err(internal_error)?;
    match post {
        Some(post) => Ok(Json(json!({ "success": true, "post": post }))),
        None => Err(error_response(StatusCode::NOT_FOUND, "Post not found")),
    }
}

#[derive(Deserialize)]
pub struct CheckParams {
    pub title: Option<String>,
}

pub async fn check_post(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CheckParams>,
) -> ApiResult {
    let Some(title) = params.title.filter(|t| !t.is_empty()) else {
        return Ok(Json(json!({ "exists": false })));
    };
    let exists = state
        .store
        .exists_by_title(&title)
        .await
        .map_err(internal_error)?;
    Ok(Json(json!({ "exists": exists })))
}

pub async fn list_categories() -> Json<Value> {
    Json(json!({ "success": true, "categories": taxonomy::categories() }))
}

#[derive(Deserialize)]
pub struct CategoryParams {
    pub sub: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

pub async fn list_by_category(
    State(state): State<Arc<AppState>>,
    Path(main): Path<String>,
    Query(params): Query<CategoryParams>,
) -> ApiResult {
    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    validate_paging(page, limit)?;

    let result = state
        .store
        .list_by_category(&main, params.sub.as_deref(), page, limit)
        .await
        .map_err(internal_error)?;

    Ok(Json(json!({
        "success": true,
        "posts": result.data,
        "pagination": pagination(&result),
    })))
}

#[derive(Deserialize)]
pub struct CrawlRequest {
    pub url: String,
}

pub async fn crawl(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CrawlRequest>,
) -> ApiResult {
    if request.url.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Missing URL"));
    }

    match state.pipeline.ingest(&request.url).await {
        Ok(IngestOutcome::Persisted(post)) => Ok(Json(json!({
            "success": true,
            "outcome": "persisted",
            "post": post,
        }))),
        Ok(IngestOutcome::Duplicate { title }) => Ok(Json(json!({
            "success": true,
            "outcome": "duplicate",
            "title": title,
        }))),
        Err(e @ Error::Fetch(_)) => Err(error_response(StatusCode::BAD_GATEWAY, &e.to_string())),
        Err(e @ Error::Extraction(_)) => {
            Err(error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()))
        }
        Err(e) => Err(internal_error(e)),
    }
}

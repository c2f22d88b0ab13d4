// JSON API over the content store. Reads are open; every write goes through
// the session gate via an opaque token in the `x-session-token` header.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    models::{Link, Page, Post},
};

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct PageBody {
    name: String,
}

#[derive(Deserialize)]
struct CreatePostBody {
    title: String,
    content: String,
    page_id: i64,
}

#[derive(Deserialize)]
struct UpdatePostBody {
    title: String,
    content: String,
}

#[derive(Deserialize)]
struct CreateLinkBody {
    url: String,
    description: Option<String>,
    page_id: i64,
}

#[derive(Deserialize)]
struct UpdateLinkBody {
    url: String,
    description: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/session", post(login).delete(logout))
        .route("/pages", get(list_pages).post(create_page))
        .route("/pages/{id}", put(update_page).delete(delete_page))
        .route("/pages/{id}/posts", get(list_posts))
        .route("/pages/{id}/links", get(list_links))
        .route("/posts", post(create_post))
        .route("/posts/{id}", put(update_post).delete(delete_post))
        .route("/links", post(create_link))
        .route("/links/{id}", put(update_link).delete(delete_link))
        .with_state(state)
}

fn session_token(headers: &HeaderMap) -> AppResult<Uuid> {
    headers
        .get("x-session-token")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or_else(|| AppError::Unauthorized("missing or malformed session token".to_string()))
}

async fn require_admin(state: &AppState, headers: &HeaderMap) -> AppResult<()> {
    let token = session_token(headers)?;
    if state.sessions.is_admin(token).await {
        Ok(())
    } else {
        Err(AppError::Unauthorized("admin session required".to_string()))
    }
}

// ---- session ----

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    let token = state
        .sessions
        .login(state.verifier.as_ref(), &request.username, &request.password)
        .await?;
    info!("admin session opened");
    Ok(Json(json!({ "token": token })))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<StatusCode> {
    let token = session_token(&headers)?;
    state.sessions.logout(token).await;
    Ok(StatusCode::NO_CONTENT)
}

// ---- pages ----

async fn list_pages(State(state): State<AppState>) -> AppResult<Json<Vec<Page>>> {
    Ok(Json(state.store.list_pages().await?))
}

async fn create_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PageBody>,
) -> AppResult<(StatusCode, Json<Value>)> {
    require_admin(&state, &headers).await?;
    let id = state.store.create_page(&body.name).await?;
    info!("created page {} ({:?})", id, body.name);
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<PageBody>,
) -> AppResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let outcome = state.store.update_page(id, &body.name).await?;
    Ok(Json(json!({ "applied": outcome.applied() })))
}

async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let outcome = state.store.delete_page(id).await?;
    info!("deleted page {} (applied: {})", id, outcome.applied());
    Ok(Json(json!({ "applied": outcome.applied() })))
}

// ---- posts ----

async fn list_posts(
    State(state): State<AppState>,
    Path(page_id): Path<i64>,
) -> AppResult<Json<Vec<Post>>> {
    Ok(Json(state.store.list_posts(page_id).await?))
}

async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreatePostBody>,
) -> AppResult<(StatusCode, Json<Value>)> {
    require_admin(&state, &headers).await?;
    let id = state
        .store
        .create_post(&body.title, &body.content, body.page_id)
        .await?;
    info!("created post {} on page {}", id, body.page_id);
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<UpdatePostBody>,
) -> AppResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let outcome = state.store.update_post(id, &body.title, &body.content).await?;
    Ok(Json(json!({ "applied": outcome.applied() })))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let outcome = state.store.delete_post(id).await?;
    Ok(Json(json!({ "applied": outcome.applied() })))
}

// ---- links ----

async fn list_links(
    State(state): State<AppState>,
    Path(page_id): Path<i64>,
) -> AppResult<Json<Vec<Link>>> {
    Ok(Json(state.store.list_links(page_id).await?))
}

async fn create_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateLinkBody>,
) -> AppResult<(StatusCode, Json<Value>)> {
    require_admin(&state, &headers).await?;
    let id = state
        .store
        .create_link(&body.url, body.description.as_deref(), body.page_id)
        .await?;
    info!("created link {} on page {}", id, body.page_id);
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn update_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<UpdateLinkBody>,
) -> AppResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let outcome = state
        .store
        .update_link(id, &body.url, body.description.as_deref())
        .await?;
    Ok(Json(json!({ "applied": outcome.applied() })))
}

async fn delete_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let outcome = state.store.delete_link(id).await?;
    Ok(Json(json!({ "applied": outcome.applied() })))
}

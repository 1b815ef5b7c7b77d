use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const CSRF_HEADER: &str = "x-csrf-token";
pub const CSRF_FIELD: &str = "csrf_token";

/// Like counters keyed by the posted `id`.
pub type Likes = Arc<RwLock<HashMap<String, u64>>>;

/// Body returned by the JSON endpoints: the posted fields minus the token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Saved {
    pub saved: bool,
    pub fields: HashMap<String, String>,
}

pub fn app() -> Router {
    let likes: Likes = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/like", post(like))
        .route("/save", post(save))
        .route("/comment", post(comment))
        .route("/broken", post(broken))
        .route("/fail", post(fail))
        .with_state(likes)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The header and the body token must agree and must not be empty.
fn check_token(headers: &HeaderMap, body_token: Option<&str>) -> Result<(), StatusCode> {
    let header = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    match body_token {
        Some(token) if !token.is_empty() && token == header => Ok(()),
        _ => {
            tracing::warn!(header, ?body_token, "csrf token mismatch");
            Err(StatusCode::FORBIDDEN)
        }
    }
}

async fn like(
    State(likes): State<Likes>,
    headers: HeaderMap,
    Form(mut input): Form<HashMap<String, String>>,
) -> Result<Html<String>, StatusCode> {
    check_token(&headers, input.get(CSRF_FIELD).map(String::as_str))?;
    let id = input.remove("id").ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let mut likes = likes.write().await;
    let count = likes.entry(id).or_insert(0);
    *count += 1;
    Ok(Html(format!("<span>{count} likes</span>")))
}

async fn save(headers: HeaderMap, mut multipart: Multipart) -> Result<Json<Saved>, StatusCode> {
    let mut fields = HashMap::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        fields.insert(name, value);
    }
    check_token(&headers, fields.get(CSRF_FIELD).map(String::as_str))?;
    fields.remove(CSRF_FIELD);
    Ok(Json(Saved {
        saved: true,
        fields,
    }))
}

async fn comment(
    headers: HeaderMap,
    Form(mut fields): Form<HashMap<String, String>>,
) -> Result<Json<Saved>, StatusCode> {
    check_token(&headers, fields.get(CSRF_FIELD).map(String::as_str))?;
    fields.remove(CSRF_FIELD);
    Ok(Json(Saved {
        saved: true,
        fields,
    }))
}

async fn broken() -> Html<&'static str> {
    Html("<p>not json</p>")
}

async fn fail() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

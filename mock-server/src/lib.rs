use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::Redirect,
    routing::{any, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// What `/echo` saw of the incoming request.
#[derive(Debug, Serialize)]
pub struct Echo {
    pub method: String,
    /// Lowercased header name to every value received for it.
    pub headers: Map<String, Value>,
    pub content_type: Option<String>,
    /// Parsed JSON body, the raw text if it was not JSON, or null if empty.
    pub body: Value,
    pub body_len: usize,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Value>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/echo", any(echo))
        .route("/array", get(array))
        .route("/text", get(text))
        .route("/redirect", get(redirect))
        .route("/posts", post(create_post))
        .route("/posts/{id}", get(get_post))
        .route("/status/{code}", get(status))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let mut seen = Map::new();
    for (name, value) in &headers {
        let value = Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned());
        if let Value::Array(values) = seen
            .entry(name.as_str().to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            values.push(value);
        }
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let parsed = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };

    log::debug!("echo {method} ({} bytes)", body.len());
    Json(Echo {
        method: method.to_string(),
        headers: seen,
        content_type,
        body: parsed,
        body_len: body.len(),
    })
}

async fn array() -> Json<Value> {
    Json(json!([1, 2, 3]))
}

async fn text() -> &'static str {
    "not json"
}

async fn redirect() -> Redirect {
    Redirect::temporary("/echo")
}

async fn create_post(
    State(db): State<Db>,
    Json(input): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let Value::Object(mut fields) = input else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let id = Uuid::new_v4();
    fields.insert("id".to_string(), Value::String(id.to_string()));
    let stored = Value::Object(fields);
    db.write().await.insert(id, stored.clone());
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn get_post(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, StatusCode> {
    let posts = db.read().await;
    posts.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn status(Path(code): Path<u16>) -> Result<StatusCode, StatusCode> {
    StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)
}

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::model::Airport;
use crate::state::{Bearer, Db};

pub fn router() -> Router<Db> {
    Router::new()
        .route("/airports", get(airports))
        .route("/notifications/register", post(register_push))
        .route("/notifications/unregister", axum::routing::delete(unregister_push))
}

#[derive(Deserialize)]
struct AirportQuery {
    search: Option<String>,
}

#[derive(Deserialize)]
struct PushRegistration {
    token: String,
    platform: String,
}

#[derive(Deserialize)]
struct PushToken {
    token: String,
}

async fn airports(State(db): State<Db>, Query(query): Query<AirportQuery>) -> Json<Vec<Airport>> {
    let db = db.read().await;
    let needle = query.search.unwrap_or_default().to_lowercase();
    let found = db
        .airports
        .iter()
        .filter(|a| {
            needle.is_empty()
                || a.code.to_lowercase().contains(&needle)
                || a.name.to_lowercase().contains(&needle)
                || a.city.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    Json(found)
}

async fn register_push(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Json(input): Json<PushRegistration>,
) -> Result<Json<Value>, AppError> {
    if !matches!(input.platform.as_str(), "ios" | "android") {
        return Err(AppError::BadRequest("Unsupported platform".to_string()));
    }
    let mut db = db.write().await;
    db.principal(&token)?;
    db.push_tokens.insert(input.token, input.platform);
    Ok(Json(json!({ "success": true })))
}

async fn unregister_push(
    State(db): State<Db>,
    Bearer(token): Bearer,
    Json(input): Json<PushToken>,
) -> Result<Json<Value>, AppError> {
    let mut db = db.write().await;
    db.principal(&token)?;
    db.push_tokens.remove(&input.token);
    Ok(Json(json!({ "success": true })))
}

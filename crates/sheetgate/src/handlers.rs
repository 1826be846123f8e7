use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use sheetgate_core::envelope::{Failure, Message, Status};
use sheetgate_core::errors::Result;
use sheetgate_core::request::{AddEntry, LinesQuery, SheetQuery, UpdateCell, UpdateEntry};
use sheetgate_core::service::{SheetService, into_status};
use tracing::{debug, warn};

/// State that's passed to all handlers.
#[derive(Debug)]
pub struct ServerState {
    pub service: SheetService,
    /// Pre-rendered OpenAPI document.
    pub openapi: Value,
}

/// Render a read result. Failures are reported in the body with a 200.
fn read_response<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            warn!(%e, "read failed");
            Json(Failure::from(e)).into_response()
        }
    }
}

fn rejected_query(rejection: QueryRejection) -> Response {
    debug!(%rejection, "rejected query");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(Failure {
            error: rejection.body_text(),
        }),
    )
        .into_response()
}

fn rejected_body(rejection: JsonRejection) -> Response {
    debug!(%rejection, "rejected payload");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(Status::error(rejection.body_text())),
    )
        .into_response()
}

pub async fn home(State(state): State<Arc<ServerState>>) -> Json<Message> {
    Json(state.service.home())
}

pub async fn openapi(State(state): State<Arc<ServerState>>) -> Json<Value> {
    Json(state.openapi.clone())
}

pub async fn preview(
    State(state): State<Arc<ServerState>>,
    query: std::result::Result<Query<SheetQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return rejected_query(rejection),
    };
    read_response(state.service.preview(query.feuille.as_deref()).await)
}

pub async fn list_sheets(State(state): State<Arc<ServerState>>) -> Response {
    read_response(state.service.list_sheets().await)
}

pub async fn get_lines(
    State(state): State<Arc<ServerState>>,
    query: std::result::Result<Query<LinesQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return rejected_query(rejection),
    };
    read_response(state.service.get_lines(&query).await)
}

pub async fn add_entry(
    State(state): State<Arc<ServerState>>,
    body: std::result::Result<Json<AddEntry>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected_body(rejection),
    };
    Json(into_status(state.service.add_entry(&body).await)).into_response()
}

pub async fn update_entry(
    State(state): State<Arc<ServerState>>,
    body: std::result::Result<Json<UpdateEntry>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected_body(rejection),
    };
    Json(into_status(state.service.update_entry(&body).await)).into_response()
}

pub async fn update_cell(
    State(state): State<Arc<ServerState>>,
    body: std::result::Result<Json<UpdateCell>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected_body(rejection),
    };
    Json(into_status(state.service.update_cell(&body).await)).into_response()
}

//! HTTP endpoints.
//!
//! - `GET  /models` - selectable models
//! - `POST /ask`    - generate a reply and analyze its token entropy

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use wepr::model_registry::available_models;
use wepr::types::ask::{AskRequest, AskResponse};
use wepr::types::models::ModelInfo;
use wepr::{AnalysisConfig, Client};

use crate::error::ServerError;

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub client: Client,
    pub analysis: AnalysisConfig,
}

impl AppState {
    pub const fn new(client: Client, analysis: AnalysisConfig) -> Self {
        Self { client, analysis }
    }
}

/// Builds the router with permissive CORS, so a browser frontend served
/// from another origin can call it.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/models", get(list_models))
        .route("/ask", post(ask))
        .with_state(state)
        .layer(cors)
}

async fn list_models() -> Json<Vec<ModelInfo>> {
    Json(available_models())
}

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ServerError> {
    let response = state.client.ask(&request, &state.analysis).await?;
    info!(
        tokens = response.tokens.len(),
        epr = response.epr,
        risk_score = response.risk_score,
        "ask completed"
    );
    Ok(Json(response))
}

// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Generation endpoints take every parameter as a query field and answer
//! with an event stream. Saved-record endpoints are scoped to the caller's
//! verified identity.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use mise_core::MiseError;
use mise_core::types::{
    AuthIdentity, GenerationKind, GenerationRequest, GenerationResult, HealthStatus,
    MealPlanParams, RecipeParams, RecordId,
};

use crate::server::GatewayState;
use crate::sse;

/// Query string of `GET /recipeStream`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStreamQuery {
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub params: RecipeParams,
}

/// Query string of `GET /mealStream`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealStreamQuery {
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub params: MealPlanParams,
}

/// JSON body for errors and acknowledgements.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub adapters: Vec<AdapterHealth>,
}

#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub kind: String,
    pub version: String,
    pub status: String,
}

/// A [`MiseError`] rendered as `{"message": ..}` with a matching status code.
#[derive(Debug)]
pub struct ApiError(pub MiseError);

impl From<MiseError> for ApiError {
    fn from(err: MiseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MiseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MiseError::NotFound { .. } => StatusCode::NOT_FOUND,
            MiseError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = MessageBody {
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// GET /recipeStream
pub async fn recipe_stream(
    State(state): State<GatewayState>,
    Query(query): Query<RecipeStreamQuery>,
) -> Response {
    sse::stream_generation(&state, GenerationRequest::recipe(query.user_id, query.params))
}

/// GET /mealStream
pub async fn meal_stream(
    State(state): State<GatewayState>,
    Query(query): Query<MealStreamQuery>,
) -> Response {
    sse::stream_generation(
        &state,
        GenerationRequest::meal_plan(query.user_id, query.params),
    )
}

async fn list(
    state: &GatewayState,
    kind: GenerationKind,
    identity: &AuthIdentity,
) -> Result<Json<Vec<GenerationResult>>, ApiError> {
    let records = state
        .store
        .list_generations(kind, &identity.user_id)
        .await?;
    Ok(Json(records))
}

async fn fetch(
    state: &GatewayState,
    kind: GenerationKind,
    identity: &AuthIdentity,
    id: String,
) -> Result<Json<GenerationResult>, ApiError> {
    let record = state
        .store
        .get_generation(kind, &identity.user_id, &RecordId(id.clone()))
        .await?
        .ok_or_else(|| MiseError::NotFound {
            kind: record_label(kind).into(),
            id,
        })?;
    Ok(Json(record))
}

async fn remove(
    state: &GatewayState,
    kind: GenerationKind,
    identity: &AuthIdentity,
    id: String,
) -> Result<Json<MessageBody>, ApiError> {
    let deleted = state
        .store
        .delete_generation(kind, &identity.user_id, &RecordId(id.clone()))
        .await?;
    if !deleted {
        return Err(MiseError::NotFound {
            kind: record_label(kind).into(),
            id,
        }
        .into());
    }
    tracing::info!(%kind, record_id = %id, user_id = %identity.user_id, "record deleted");
    Ok(Json(MessageBody {
        message: "Item deleted successfully".into(),
    }))
}

fn record_label(kind: GenerationKind) -> &'static str {
    match kind {
        GenerationKind::Recipe => "recipe",
        GenerationKind::MealPlan => "meal plan",
    }
}

/// GET /recipes/saved-recipes
pub async fn saved_recipes(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Json<Vec<GenerationResult>>, ApiError> {
    list(&state, GenerationKind::Recipe, &identity).await
}

/// GET /recipes/{id}
pub async fn get_recipe(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<GenerationResult>, ApiError> {
    fetch(&state, GenerationKind::Recipe, &identity, id).await
}

/// DELETE /recipes/{id}
pub async fn delete_recipe(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    remove(&state, GenerationKind::Recipe, &identity, id).await
}

/// GET /meals/saved-meals
pub async fn saved_meals(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Json<Vec<GenerationResult>>, ApiError> {
    list(&state, GenerationKind::MealPlan, &identity).await
}

/// GET /meal/{id}
pub async fn get_meal(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<GenerationResult>, ApiError> {
    fetch(&state, GenerationKind::MealPlan, &identity, id).await
}

/// DELETE /meal/{id}
pub async fn delete_meal(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    remove(&state, GenerationKind::MealPlan, &identity, id).await
}

/// GET /health
///
/// 200 when every adapter is healthy, 503 otherwise.
pub async fn health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let mut adapters = Vec::with_capacity(state.adapters.len());
    let mut healthy = true;

    for adapter in &state.adapters {
        let status = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => "healthy".to_string(),
            Ok(HealthStatus::Degraded(reason)) => {
                healthy = false;
                format!("degraded: {reason}")
            }
            Ok(HealthStatus::Unhealthy(reason)) => {
                healthy = false;
                format!("unhealthy: {reason}")
            }
            Err(e) => {
                healthy = false;
                format!("unhealthy: {e}")
            }
        };
        adapters.push(AdapterHealth {
            name: adapter.name().to_string(),
            kind: adapter.adapter_type().to_string(),
            version: adapter.version().to_string(),
            status,
        });
    }

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        code,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: state.start_time.elapsed().as_secs(),
            adapters,
        }),
    )
}

//! REST endpoints the presentation layer uses to drive the wizard.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::error::WizardError;

use super::controller::{AdvanceOutcome, WizardController, WizardView};
use super::model::{AnswersUpdate, PlanOffer, RECOMMENDED_PLAN, SECTORS, UploadedFile};

/// Shared state for wizard routes.
#[derive(Clone)]
pub struct WizardRouteState {
    pub controller: Arc<WizardController>,
}

#[derive(Serialize)]
struct AdvanceResponse {
    #[serde(flatten)]
    outcome: AdvanceOutcome,
    state: WizardView,
}

#[derive(Serialize)]
struct Catalog {
    sectors: &'static [&'static str],
    plan: PlanOffer,
}

fn conflict(error: WizardError) -> Response {
    (
        StatusCode::CONFLICT,
        Json(serde_json::json!({ "error": error.user_message() })),
    )
        .into_response()
}

/// GET /api/wizard/state
async fn get_state(State(state): State<WizardRouteState>) -> impl IntoResponse {
    Json(state.controller.view().await)
}

/// POST /api/wizard/advance
async fn advance(State(state): State<WizardRouteState>) -> impl IntoResponse {
    let outcome = state.controller.advance().await;
    Json(AdvanceResponse {
        outcome,
        state: state.controller.view().await,
    })
}

/// POST /api/wizard/files
async fn receive_file(
    State(state): State<WizardRouteState>,
    Json(file): Json<UploadedFile>,
) -> Response {
    match state.controller.receive_file(file).await {
        Ok(_) => Json(state.controller.view().await).into_response(),
        Err(e) => conflict(e),
    }
}

/// PATCH /api/wizard/answers
async fn update_answers(
    State(state): State<WizardRouteState>,
    Json(update): Json<AnswersUpdate>,
) -> Response {
    match state.controller.update_answers(update).await {
        Ok(()) => Json(state.controller.view().await).into_response(),
        Err(e) => conflict(e),
    }
}

/// POST /api/wizard/reset
async fn reset(State(state): State<WizardRouteState>) -> Response {
    if state.controller.reset().await {
        Json(state.controller.view().await).into_response()
    } else {
        (
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "error": "A submission is still in progress" })),
        )
            .into_response()
    }
}

/// GET /api/wizard/catalog
async fn get_catalog() -> impl IntoResponse {
    Json(Catalog {
        sectors: &SECTORS,
        plan: RECOMMENDED_PLAN,
    })
}

/// Build the wizard REST routes.
pub fn wizard_routes(state: WizardRouteState) -> Router {
    Router::new()
        .route("/api/wizard/state", get(get_state))
        .route("/api/wizard/advance", post(advance))
        .route("/api/wizard/files", post(receive_file))
        .route("/api/wizard/answers", patch(update_answers))
        .route("/api/wizard/reset", post(reset))
        .route("/api/wizard/catalog", get(get_catalog))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

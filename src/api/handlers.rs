//! HTTP request handlers for the leave engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::Datelike;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{ToggleOutcome, partner_balance, set_year, toggle_partner_day};
use crate::error::EngineError;
use crate::models::RosterDocument;

use super::request::{BalanceQuery, PartnerPatch, SettingsPatch, ToggleRequest, YearBody};
use super::response::{ApiError, ApiErrorResponse, SuccessResponse, ToggleResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/data", get(get_data_handler).put(put_data_handler))
        .route("/api/partners/:id", patch(patch_partner_handler))
        .route("/api/partners/:id/days", post(toggle_day_handler))
        .route("/api/partners/:id/balance", get(balance_handler))
        .route("/api/settings", patch(patch_settings_handler))
        .route("/api/year", patch(patch_year_handler))
        .route("/api/holidays/:year", get(holidays_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for GET /api/data.
///
/// Returns the whole roster document, seeding the store first when empty.
async fn get_data_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Fetching roster document");

    let _guard = state.lock_writes().await;
    match state.load_or_seed().await {
        Ok(document) => json_response(StatusCode::OK, document),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for PUT /api/data.
///
/// Replaces the whole roster document.
async fn put_data_handler(
    State(state): State<AppState>,
    payload: Result<Json<RosterDocument>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let document = match payload {
        Ok(Json(document)) => document,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let _guard = state.lock_writes().await;
    match state.save(&document).await {
        Ok(()) => {
            info!(
                correlation_id = %correlation_id,
                partners = document.partners.len(),
                "Replaced roster document"
            );
            json_response(StatusCode::OK, SuccessResponse { success: true })
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for PATCH /api/partners/:id.
///
/// Merges the provided fields into the partner and returns it.
async fn patch_partner_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PartnerPatch>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let _guard = state.lock_writes().await;
    let result = async {
        let mut document = state.load_or_seed().await?;
        let index = document
            .partners
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| EngineError::PartnerNotFound { id: id.clone() })?;

        let updated = patch.apply(document.partners[index].clone());
        document.partners[index] = updated.clone();
        state.save(&document).await?;
        Ok::<_, EngineError>(updated)
    }
    .await;

    match result {
        Ok(partner) => {
            info!(correlation_id = %correlation_id, partner_id = %partner.id, "Updated partner");
            json_response(StatusCode::OK, partner)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for PATCH /api/settings.
async fn patch_settings_handler(
    State(state): State<AppState>,
    payload: Result<Json<SettingsPatch>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let _guard = state.lock_writes().await;
    let result = async {
        let mut document = state.load_or_seed().await?;
        document.settings = patch.apply(document.settings);
        state.save(&document).await?;
        Ok::<_, EngineError>(document.settings)
    }
    .await;

    match result {
        Ok(settings) => {
            info!(
                correlation_id = %correlation_id,
                count_holidays_as_leave = settings.count_holidays_as_leave,
                "Updated settings"
            );
            json_response(StatusCode::OK, settings)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for PATCH /api/year.
async fn patch_year_handler(
    State(state): State<AppState>,
    payload: Result<Json<YearBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let YearBody { year } = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let _guard = state.lock_writes().await;
    let result = async {
        let document = set_year(&state.load_or_seed().await?, year);
        state.save(&document).await
    }
    .await;

    match result {
        Ok(()) => {
            info!(correlation_id = %correlation_id, year, "Changed displayed year");
            json_response(StatusCode::OK, YearBody { year })
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /api/partners/:id/days.
///
/// Toggles one date in one category. Refusals are answered with 409 (limit
/// reached) or 422 (day not selectable) and leave the document untouched.
async fn toggle_day_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ToggleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        partner_id = %id,
        date = %request.date,
        category = %request.category,
        "Processing day toggle"
    );

    let _guard = state.lock_writes().await;
    let result = async {
        let document = state.load_or_seed().await?;
        let year = request.year.unwrap_or(request.date.year());
        let holidays = state.holidays().holidays_for(year).await;

        let (updated, outcome) = toggle_partner_day(
            &document,
            &id,
            year,
            request.date,
            request.category,
            &holidays,
        )?;

        match outcome {
            ToggleOutcome::LimitExceeded { category, limit } => {
                return Err(EngineError::LimitExceeded { category, limit });
            }
            ToggleOutcome::Inert { class } => return Ok(Err(class)),
            _ => state.save(&updated).await?,
        }

        let balance = partner_balance(&updated, &id, year, &holidays)?;
        Ok::<_, EngineError>(Ok(ToggleResponse { outcome, balance }))
    }
    .await;

    match result {
        Ok(Ok(response)) => {
            info!(
                correlation_id = %correlation_id,
                partner_id = %id,
                remaining = response.balance.remaining,
                "Day toggle applied"
            );
            json_response(StatusCode::OK, response)
        }
        Ok(Err(class)) => {
            warn!(correlation_id = %correlation_id, class = %class, "Day not selectable");
            let api_error = ApiErrorResponse::day_not_selectable(class);
            json_response(api_error.status, api_error.error)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /api/partners/:id/balance.
async fn balance_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let _guard = state.lock_writes().await;
    let result = async {
        let document = state.load_or_seed().await?;
        let year = query.year.unwrap_or(document.year);
        let holidays = state.holidays().holidays_for(year).await;
        partner_balance(&document, &id, year, &holidays)
    }
    .await;

    match result {
        Ok(balance) => json_response(StatusCode::OK, balance),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /api/holidays/:year.
async fn holidays_handler(State(state): State<AppState>, Path(year): Path<i32>) -> Response {
    let holidays = state.holidays().holidays_for(year).await;
    json_response(StatusCode::OK, holidays)
}

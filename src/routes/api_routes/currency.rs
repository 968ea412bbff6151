use crate::models::{AppState, CurrencyInput, DataResponse};
use crate::AppError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;

pub(super) async fn currencies(State(state): State<AppState>) -> impl IntoResponse {
    match state.currency_service.list_all().await {
        Ok(currencies) => (StatusCode::OK, Json(DataResponse::new(currencies))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(super) async fn currency(
    State(state): State<AppState>,
    Path(currency_code): Path<String>,
) -> impl IntoResponse {
    match state.currency_service.resolve(&currency_code).await {
        Ok(currency) => (StatusCode::OK, Json(DataResponse::new(currency))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(super) async fn create_currency(
    State(state): State<AppState>,
    payload: Result<Json<CurrencyInput>, JsonRejection>,
) -> impl IntoResponse {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return AppError::Validation(rejection.body_text()).into_response(),
    };
    match state.currency_service.create(input).await {
        Ok(currency) => (StatusCode::CREATED, Json(DataResponse::new(currency))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(super) async fn update_currency(
    State(state): State<AppState>,
    Path(currency_code): Path<String>,
    payload: Result<Json<CurrencyInput>, JsonRejection>,
) -> impl IntoResponse {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return AppError::Validation(rejection.body_text()).into_response(),
    };
    match state.currency_service.update(&currency_code, input).await {
        Ok(currency) => (StatusCode::OK, Json(DataResponse::new(currency))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(super) async fn delete_currency(
    State(state): State<AppState>,
    Path(currency_code): Path<String>,
) -> impl IntoResponse {
    match state.currency_service.delete(&currency_code).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

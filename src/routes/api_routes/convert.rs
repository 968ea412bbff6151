use crate::models::{AppState, ConvertQuery, DataResponse};
use crate::AppError;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;

pub(super) async fn convert(
    State(state): State<AppState>,
    query: Result<Query<ConvertQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return AppError::Validation(rejection.body_text()).into_response(),
    };
    match state
        .convert_service
        .convert(&query.from_this, &query.to, query.amount)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(DataResponse::new(result))).into_response(),
        Err(err) => err.into_response(),
    }
}
